use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Parse the timestamp shapes the catalog API produces.
///
/// Accepts RFC 3339 (`2024-01-15T14:30:00Z`, with offset or fraction),
/// naive date-times (`2024-01-15T14:30:00`, treated as UTC) and plain
/// dates (`2024-12-31`, midnight UTC). Anything else yields `None`.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let got = parse_instant("2024-01-15T16:30:00+02:00").unwrap();
        assert_eq!(got, Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn parses_python_isoformat_with_micros() {
        let got = parse_instant("2025-03-01T08:00:00.123456+00:00").unwrap();
        assert_eq!(got.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn parses_naive_and_date_only() {
        assert_eq!(
            parse_instant("2024-12-31").unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_instant("2024-12-31T23:59:59").unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_instant("").is_none());
        assert!(parse_instant("next tuesday").is_none());
    }

    #[test]
    fn now_is_parseable() {
        assert!(parse_instant(&now_rfc3339()).is_some());
    }
}

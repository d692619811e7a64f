use catalog_types::parse_instant;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Shown for a missing date.
pub const NO_DATE: &str = "—";

/// Human-readable byte count, base 1024 with two decimals.
///
/// ```
/// use catalog_dashboard::view::fmt_size;
/// assert_eq!(fmt_size(0), "0 B");
/// assert_eq!(fmt_size(1536), "1.50 KB");
/// ```
pub fn fmt_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// `YYYY-MM-DD HH:MM:SS` in UTC. Missing or blank values show as
/// [`NO_DATE`]; unparseable ones are shown as given.
pub fn fmt_datetime(value: Option<&str>) -> String {
    format_with(value, "%Y-%m-%d %H:%M:%S")
}

/// `YYYY-MM-DD`, same fallbacks as [`fmt_datetime`].
pub fn fmt_date(value: Option<&str>) -> String {
    format_with(value, "%Y-%m-%d")
}

fn format_with(value: Option<&str>, pattern: &str) -> String {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return NO_DATE.to_string();
    };
    match parse_instant(raw) {
        Some(t) => t.format(pattern).to_string(),
        None => raw.to_string(),
    }
}

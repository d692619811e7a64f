use serde::{Deserialize, Deserializer, Serialize};

/// Which of the two release-note lists an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCategory {
    Event,
    Infra,
}

impl ChangeCategory {
    /// Prefix used by the legacy flat-string encoding.
    pub fn prefix(self) -> &'static str {
        match self {
            ChangeCategory::Event => "event:",
            ChangeCategory::Infra => "infra:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub category: ChangeCategory,
    pub text: String,
}

/// Release changelog: an ordered list of `{category, text}` entries.
///
/// Serialized as the tagged list. Deserialization also accepts the legacy
/// form, a flat array of `"event:..."` / `"infra:..."` strings, so releases
/// written by older clients still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Changelog(Vec<ChangeEntry>);

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the two multi-line text areas of the release form.
    /// Lines are trimmed and blank lines skipped; events come first.
    pub fn from_texts(events: &str, infra: &str) -> Self {
        let mut log = Changelog::new();
        for line in events.lines() {
            log.push(ChangeCategory::Event, line);
        }
        for line in infra.lines() {
            log.push(ChangeCategory::Infra, line);
        }
        log
    }

    /// Append an entry. Blank text is ignored.
    pub fn push(&mut self, category: ChangeCategory, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.0.push(ChangeEntry {
                category,
                text: text.to_string(),
            });
        }
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn texts_of(&self, category: ChangeCategory) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.text.as_str())
            .collect()
    }

    pub fn events(&self) -> Vec<&str> {
        self.texts_of(ChangeCategory::Event)
    }

    pub fn infra(&self) -> Vec<&str> {
        self.texts_of(ChangeCategory::Infra)
    }

    /// Back to the two text areas, one entry per line.
    pub fn to_texts(&self) -> (String, String) {
        (self.events().join("\n"), self.infra().join("\n"))
    }

    /// Legacy encoding: `event:` entries first, then `infra:` entries.
    pub fn encode_prefixed(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.0.len());
        for category in [ChangeCategory::Event, ChangeCategory::Infra] {
            out.extend(
                self.texts_of(category)
                    .into_iter()
                    .map(|t| format!("{}{}", category.prefix(), t)),
            );
        }
        out
    }

    /// Legacy decoding. Prefixes match case-insensitively at the start of
    /// the string only; strings with neither prefix are dropped.
    pub fn decode_prefixed<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut log = Changelog::new();
        for line in lines {
            if let Some((category, text)) = split_prefixed(line.as_ref()) {
                log.push(category, text);
            }
        }
        log
    }
}

fn split_prefixed(line: &str) -> Option<(ChangeCategory, &str)> {
    for category in [ChangeCategory::Event, ChangeCategory::Infra] {
        let prefix = category.prefix();
        if let Some(head) = line.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return Some((category, &line[prefix.len()..]));
            }
        }
    }
    None
}

impl<'de> Deserialize<'de> for Changelog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Tagged(ChangeEntry),
            Legacy(String),
        }

        let items: Option<Vec<Wire>> = Option::deserialize(deserializer)?;
        let mut log = Changelog::new();
        for item in items.unwrap_or_default() {
            match item {
                Wire::Tagged(entry) => log.push(entry.category, &entry.text),
                Wire::Legacy(line) => {
                    if let Some((category, text)) = split_prefixed(&line) {
                        log.push(category, text);
                    }
                }
            }
        }
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_round_trip() {
        let log = Changelog::from_texts("A\nB", "C");
        let encoded = log.encode_prefixed();
        assert_eq!(encoded, vec!["event:A", "event:B", "infra:C"]);

        let decoded = Changelog::decode_prefixed(&encoded);
        assert_eq!(decoded.events(), vec!["A", "B"]);
        assert_eq!(decoded.infra(), vec!["C"]);
    }

    #[test]
    fn event_mentioning_infra_prefix_stays_an_event() {
        let log = Changelog::from_texts("moved infra: to new cluster\ninfra: rollout", "");
        let decoded = Changelog::decode_prefixed(&log.encode_prefixed());
        assert_eq!(
            decoded.events(),
            vec!["moved infra: to new cluster", "infra: rollout"]
        );
        assert!(decoded.infra().is_empty());
    }

    #[test]
    fn legacy_decoding_trims_and_drops_unknown() {
        let decoded = Changelog::decode_prefixed(&["EVENT:  Launch  ", "note without prefix", "Infra:DB"]);
        assert_eq!(decoded.events(), vec!["Launch"]);
        assert_eq!(decoded.infra(), vec!["DB"]);
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn texts_skip_blank_lines() {
        let log = Changelog::from_texts("  one \n\n two", "\n");
        assert_eq!(log.to_texts(), ("one\ntwo".to_string(), String::new()));
    }

    #[test]
    fn deserializes_both_wire_forms() {
        let legacy: Changelog = serde_json::from_str(r#"["event:A", "infra:C"]"#).unwrap();
        let tagged: Changelog = serde_json::from_str(
            r#"[{"category": "event", "text": "A"}, {"category": "infra", "text": "C"}]"#,
        )
        .unwrap();
        assert_eq!(legacy, tagged);

        let null: Changelog = serde_json::from_str("null").unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn serializes_tagged() {
        let log = Changelog::from_texts("A", "");
        assert_eq!(
            serde_json::to_value(&log).unwrap(),
            serde_json::json!([{"category": "event", "text": "A"}])
        );
    }
}

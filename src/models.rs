use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One entry of the payload catalog, as stored in `payloads.json`.
///
/// Any legacy `count` field in the document is ignored; scores are computed
/// per selection and never stored on the record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Payload {
    #[serde(rename = "Payload")]
    pub content: String,
    /// Characters that must survive reflection for the payload to work.
    #[serde(rename = "Attribute", default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub waf: Option<String>,
}

impl Payload {
    pub fn new(content: &str, attributes: &[&str], waf: Option<&str>) -> Self {
        Payload {
            content: content.to_string(),
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
            waf: waf.map(str::to_string),
        }
    }

    /// Required characters; multi-character attribute strings are ignored.
    pub fn required_characters(&self) -> HashSet<char> {
        self.attributes
            .iter()
            .filter_map(|a| {
                let mut chars = a.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            })
            .collect()
    }

    /// True when the payload is not tied to a particular firewall vendor.
    pub fn is_generic(&self) -> bool {
        self.waf.as_deref().map_or(true, |w| w.trim().is_empty())
    }
}

/// A confirmed reflected XSS.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct ScanResult {
    /// Target URL as it was supplied.
    pub url: String,
    pub parameter: String,
    pub payload: String,
    /// Human readable URL with the injecting parameter rewritten to the payload.
    pub proof_url: String,
}

/// Terminal state of one target's scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Vulnerable(ScanResult),
    Clean,
    /// The URL carries no query parameters; nothing was tested.
    NotApplicable,
    Invalid(String),
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entry_deserializes_and_ignores_count() {
        let raw = r#"{"Payload": "<svg onload=alert(1)>", "Attribute": ["<", ">", "=", "("], "waf": "cloudflare", "count": 7}"#;
        let p: Payload = serde_json::from_str(raw).unwrap();
        assert_eq!(p.content, "<svg onload=alert(1)>");
        assert_eq!(p.waf.as_deref(), Some("cloudflare"));
        assert!(!p.is_generic());
        assert_eq!(p.required_characters(), ['<', '>', '=', '('].into_iter().collect::<HashSet<char>>());
    }

    #[test]
    fn null_waf_is_generic() {
        let raw = r#"{"Payload": "x", "Attribute": ["'", "ab"], "waf": null}"#;
        let p: Payload = serde_json::from_str(raw).unwrap();
        assert!(p.is_generic());
        assert_eq!(p.required_characters(), ['\''].into_iter().collect::<HashSet<char>>());
    }
}

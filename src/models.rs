//! Core data models for Scriptorium
//!
//! These models are used throughout the codebase for representing
//! cards, their manuscript anchors, and validation outcomes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Top-level keys every card line must carry.
pub const REQUIRED_CARD_KEYS: &[&str] = &[
    "id",
    "domain",
    "source",
    "evidence_latin",
    "concept_ja",
    "qa",
    "tags",
];

/// Keys every `source` object must carry.
pub const REQUIRED_SOURCE_KEYS: &[&str] = &["work", "file", "locator"];

/// Keys every `qa` entry must carry.
pub const REQUIRED_QA_KEYS: &[&str] = &["q", "a", "evidence_ref"];

/// Number of question/answer entries a card carries (what, how, why).
pub const QA_LEN: usize = 3;

/// Subject area of the excerpt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Herbal,
    Regimen,
    Astronomy,
}

impl Domain {
    pub fn all() -> &'static [Domain] {
        &[Domain::Herbal, Domain::Regimen, Domain::Astronomy]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Herbal => "herbal",
            Domain::Regimen => "regimen",
            Domain::Astronomy => "astronomy",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::all()
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("bad domain '{}'", s))
    }
}

/// Line-range citation into the source file.
///
/// Cards in the wild carry either a bare range (`"12-14"`) or an object
/// with a `lines` field and extra folio details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    Range(String),
    Detailed {
        #[serde(default)]
        lines: String,
        #[serde(flatten)]
        extra: BTreeMap<String, serde_json::Value>,
    },
}

impl Locator {
    /// The line-range text a reviewer checks against the manuscript.
    pub fn lines(&self) -> &str {
        match self {
            Locator::Range(s) => s,
            Locator::Detailed { lines, .. } => lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines().trim().is_empty()
    }
}

impl Default for Locator {
    fn default() -> Self {
        Locator::Range(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Source {
    pub work: String,
    pub file: String,
    pub locator: Locator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaEntry {
    pub q: String,
    pub a: String,
    pub evidence_ref: String,
}

/// One annotated excerpt record.
///
/// Cards are read-only: validation and generation borrow them and never
/// write back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub domain: Domain,
    pub source: Source,
    pub evidence_latin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_ja: Option<String>,
    pub concept_ja: String,
    pub qa: Vec<QaEntry>,
    pub tags: Vec<String>,
}

impl Card {
    /// Text of a named field the policy scanner may inspect.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "concept_ja" => Some(&self.concept_ja),
            "evidence_ja" => self.evidence_ja.as_deref(),
            "evidence_latin" => Some(&self.evidence_latin),
            _ => None,
        }
    }
}

/// Whether a reason stops a record from being accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Reject => write!(f, "reject"),
        }
    }
}

/// Malformed records need their structure fixed; policy violations need
/// their wording fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    Malformed,
    Policy,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Malformed => write!(f, "malformed"),
            ViolationKind::Policy => write!(f, "policy"),
        }
    }
}

/// A single reason attached to a record outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    /// Name of the check that produced this reason
    pub rule: String,
    pub kind: ViolationKind,
    pub severity: Severity,
    pub message: String,
}

impl Reason {
    pub fn malformed(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            kind: ViolationKind::Malformed,
            severity: Severity::Reject,
            message: message.into(),
        }
    }

    pub fn policy(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            kind: ViolationKind::Policy,
            severity: Severity::Reject,
            message: message.into(),
        }
    }

    pub fn warning(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            kind: ViolationKind::Policy,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_rejecting(&self) -> bool {
        self.severity == Severity::Reject
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accept,
    Reject,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => write!(f, "ACCEPT"),
            Verdict::Reject => write!(f, "REJECT"),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A card that passes every built-in check.
    pub(crate) fn sample_card_json() -> serde_json::Value {
        serde_json::json!({
            "id": "macer_001_rosa",
            "domain": "herbal",
            "source": {"work": "Macer", "file": "macer.txt", "locator": "12-14"},
            "evidence_latin": "Rosa frigida est et sicca in primo gradu.",
            "concept_ja": "バラは冷の性質を持つとされ、熱を鎮めるのに用いられたと伝えられる。",
            "qa": [
                {"q": "何が述べられているか", "a": "バラの性質", "evidence_ref": "12"},
                {"q": "どのように用いるか", "a": "煎じて用いたとされる", "evidence_ref": "13"},
                {"q": "なぜそう考えられたか", "a": "四性質論による", "evidence_ref": "14"}
            ],
            "tags": ["herbal", "cooling", "rose"]
        })
    }

    #[test]
    fn test_card_deserializes_string_locator() {
        let card: Card = serde_json::from_value(sample_card_json()).unwrap();
        assert_eq!(card.domain, Domain::Herbal);
        assert_eq!(card.source.locator.lines(), "12-14");
        assert!(card.evidence_ja.is_none());
    }

    #[test]
    fn test_card_deserializes_detailed_locator() {
        let mut value = sample_card_json();
        value["source"]["locator"] = serde_json::json!({"lines": "3-5", "folio": "2r"});
        let card: Card = serde_json::from_value(value).unwrap();
        assert_eq!(card.source.locator.lines(), "3-5");
        match &card.source.locator {
            Locator::Detailed { extra, .. } => assert_eq!(extra["folio"], "2r"),
            other => panic!("expected detailed locator, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_locator_is_empty() {
        assert!(Locator::Range("  ".into()).is_empty());
        assert!(Locator::Detailed {
            lines: String::new(),
            extra: BTreeMap::new()
        }
        .is_empty());
        assert!(!Locator::Range("1-2".into()).is_empty());
    }

    #[test]
    fn test_domain_parsing() {
        assert_eq!("regimen".parse::<Domain>().unwrap(), Domain::Regimen);
        assert!("alchemy".parse::<Domain>().is_err());
        assert_eq!(Domain::Astronomy.to_string(), "astronomy");
    }
}

//! Built-in content-policy rules
//!
//! Vocabulary and limits come from [`PolicyConfig`]; nothing here holds a
//! hard-coded phrase list.

use super::rules::{PolicyRule, RuleSet};
use crate::config::PolicyConfig;
use crate::error::{Result, ScriptoriumError};
use crate::models::{Card, Reason};
use regex::Regex;
use std::collections::BTreeSet;

/// Build the default rule set from policy configuration.
pub fn builtin_rules(policy: &PolicyConfig) -> Result<RuleSet> {
    Ok(RuleSet::new()
        .with_rule(ModernVocabularyRule::new(policy))
        .with_rule(AbsoluteClaimRule::new(policy))
        .with_rule(DosageRule::new(policy)?)
        .with_rule(TagCountRule {
            min: policy.min_tags,
            max: policy.max_tags,
        })
        .with_rule(IdFormatRule::new()?)
        .with_rule(QaEvidenceRefRule)
        .with_rule(DuplicateTagsRule))
}

/// `(field name, text)` for each configured field the card actually has.
fn scanned_fields<'a>(
    card: &'a Card,
    fields: &'a [String],
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    fields
        .iter()
        .filter_map(move |f| card.text_field(f).map(|text| (f.as_str(), text)))
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Rejects modern clinical or chemical vocabulary.
pub struct ModernVocabularyRule {
    terms: Vec<String>,
    fields: Vec<String>,
}

impl ModernVocabularyRule {
    pub fn new(policy: &PolicyConfig) -> Self {
        Self {
            terms: lowercase_all(&policy.modern_terms),
            fields: policy.scan_fields.clone(),
        }
    }
}

impl PolicyRule for ModernVocabularyRule {
    fn name(&self) -> &'static str {
        "modern-vocabulary"
    }

    fn description(&self) -> &'static str {
        "annotations must not use modern clinical or chemical vocabulary"
    }

    fn check(&self, card: &Card) -> Vec<Reason> {
        let mut reasons = Vec::new();
        for (field, text) in scanned_fields(card, &self.fields) {
            let lower = text.to_lowercase();
            for term in &self.terms {
                if lower.contains(term.as_str()) {
                    reasons.push(Reason::policy(
                        self.name(),
                        format!("{} uses modern term '{}'", field, term),
                    ));
                }
            }
        }
        reasons
    }
}

/// Rejects absolute-certainty claims that are not flagged as rhetoric.
pub struct AbsoluteClaimRule {
    claims: Vec<String>,
    markers: Vec<String>,
    fields: Vec<String>,
}

impl AbsoluteClaimRule {
    pub fn new(policy: &PolicyConfig) -> Self {
        Self {
            claims: lowercase_all(&policy.absolute_claims),
            markers: lowercase_all(&policy.rhetorical_markers),
            fields: policy.scan_fields.clone(),
        }
    }
}

impl PolicyRule for AbsoluteClaimRule {
    fn name(&self) -> &'static str {
        "undisclosed-absolute-claim"
    }

    fn description(&self) -> &'static str {
        "absolute claims need a rhetorical-flag marker in the same field"
    }

    fn check(&self, card: &Card) -> Vec<Reason> {
        let mut reasons = Vec::new();
        for (field, text) in scanned_fields(card, &self.fields) {
            let lower = text.to_lowercase();
            if self.markers.iter().any(|m| lower.contains(m.as_str())) {
                continue;
            }
            for claim in &self.claims {
                if lower.contains(claim.as_str()) {
                    reasons.push(Reason::policy(
                        self.name(),
                        format!(
                            "{} asserts '{}' without a rhetorical marker",
                            field, claim
                        ),
                    ));
                }
            }
        }
        reasons
    }
}

/// Rejects precise dosages ("number + unit"); attribution only.
pub struct DosageRule {
    pattern: Option<Regex>,
    fields: Vec<String>,
}

impl DosageRule {
    pub fn new(policy: &PolicyConfig) -> Result<Self> {
        Ok(Self {
            pattern: dosage_pattern(&policy.dosage_units)?,
            fields: policy.scan_fields.clone(),
        })
    }
}

/// Latin-script units must not run into further letters ("2 gradus" is not
/// grams); other scripts have no word boundary to rely on.
fn dosage_pattern(units: &[String]) -> Result<Option<Regex>> {
    let mut units: Vec<&str> = units
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .collect();
    // Longest first so "mg" wins over "g".
    units.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let (ascii, other): (Vec<&str>, Vec<&str>) = units.into_iter().partition(|u| u.is_ascii());
    let join = |list: &[&str]| {
        list.iter()
            .map(|u| regex::escape(u))
            .collect::<Vec<_>>()
            .join("|")
    };

    let mut alternatives = Vec::new();
    if !ascii.is_empty() {
        alternatives.push(format!("(?:{})(?:[^A-Za-z]|$)", join(&ascii)));
    }
    if !other.is_empty() {
        alternatives.push(format!("(?:{})", join(&other)));
    }
    if alternatives.is_empty() {
        return Ok(None);
    }

    let pattern = format!(r"(?i)\d+(?:[.,]\d+)?\s*(?:{})", alternatives.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| ScriptoriumError::Config(format!("bad dosage unit pattern: {}", e)))
}

impl PolicyRule for DosageRule {
    fn name(&self) -> &'static str {
        "precise-dosage"
    }

    fn description(&self) -> &'static str {
        "annotations must not assert precise dosages"
    }

    fn check(&self, card: &Card) -> Vec<Reason> {
        let Some(pattern) = &self.pattern else {
            return vec![];
        };
        scanned_fields(card, &self.fields)
            .filter_map(|(field, text)| {
                pattern.find(text).map(|m| {
                    Reason::policy(
                        self.name(),
                        format!("{} asserts a dosage '{}'", field, m.as_str().trim()),
                    )
                })
            })
            .collect()
    }
}

/// Flags tag sets outside the configured size range. Empty tags are a
/// structural reject handled before rules run.
pub struct TagCountRule {
    pub min: usize,
    pub max: usize,
}

impl PolicyRule for TagCountRule {
    fn name(&self) -> &'static str {
        "tag-count"
    }

    fn description(&self) -> &'static str {
        "cards should carry a small, bounded set of tags"
    }

    fn check(&self, card: &Card) -> Vec<Reason> {
        let n = card.tags.len();
        if n == 0 || (self.min..=self.max).contains(&n) {
            return vec![];
        }
        vec![Reason::warning(
            self.name(),
            format!("{} tags, expected {}-{}", n, self.min, self.max),
        )]
    }
}

/// Flags ids not shaped `{source}_{serial}_{lemma}`.
pub struct IdFormatRule {
    pattern: Regex,
}

impl IdFormatRule {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"^[A-Za-z][A-Za-z0-9-]*_\d+_\S+$")
            .map_err(|e| ScriptoriumError::Config(e.to_string()))?;
        Ok(Self { pattern })
    }
}

impl PolicyRule for IdFormatRule {
    fn name(&self) -> &'static str {
        "id-format"
    }

    fn description(&self) -> &'static str {
        "ids follow {source}_{serial}_{lemma}"
    }

    fn check(&self, card: &Card) -> Vec<Reason> {
        if self.pattern.is_match(&card.id) {
            return vec![];
        }
        vec![Reason::warning(
            self.name(),
            format!("id '{}' is not shaped source_serial_lemma", card.id),
        )]
    }
}

/// Flags answers with nothing to check them against.
pub struct QaEvidenceRefRule;

impl PolicyRule for QaEvidenceRefRule {
    fn name(&self) -> &'static str {
        "qa-evidence-ref"
    }

    fn description(&self) -> &'static str {
        "each qa entry cites the evidence it rests on"
    }

    fn check(&self, card: &Card) -> Vec<Reason> {
        card.qa
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.evidence_ref.trim().is_empty())
            .map(|(i, _)| Reason::warning(self.name(), format!("qa[{}] has a blank evidence_ref", i)))
            .collect()
    }
}

pub struct DuplicateTagsRule;

impl PolicyRule for DuplicateTagsRule {
    fn name(&self) -> &'static str {
        "duplicate-tags"
    }

    fn description(&self) -> &'static str {
        "tags form a set"
    }

    fn check(&self, card: &Card) -> Vec<Reason> {
        let mut seen = BTreeSet::new();
        let mut reported = BTreeSet::new();
        let mut reasons = Vec::new();
        for tag in &card.tags {
            if !seen.insert(tag.as_str()) && reported.insert(tag.as_str()) {
                reasons.push(Reason::warning(
                    self.name(),
                    format!("tag '{}' repeated", tag),
                ));
            }
        }
        reasons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_card_json;
    use crate::models::Severity;

    fn card() -> Card {
        serde_json::from_value(sample_card_json()).unwrap()
    }

    fn rules() -> RuleSet {
        builtin_rules(&PolicyConfig::default()).unwrap()
    }

    #[test]
    fn test_builtin_rules_accept_sample() {
        assert!(rules().check(&card()).is_empty());
        assert_eq!(rules().len(), 7);
    }

    #[test]
    fn test_modern_vocabulary_rejects() {
        let mut c = card();
        c.concept_ja = "バラには抗酸化作用がある".into();
        let reasons = rules().check(&c);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].rule, "modern-vocabulary");
        assert_eq!(reasons[0].severity, Severity::Reject);
    }

    #[test]
    fn test_modern_vocabulary_is_case_insensitive() {
        let mut c = card();
        c.concept_ja = "Rich in ANTIOXIDANT oils".into();
        assert!(rules().check(&c).iter().any(|r| r.rule == "modern-vocabulary"));
    }

    #[test]
    fn test_evidence_ja_is_scanned() {
        let mut c = card();
        c.evidence_ja = Some("ビタミンを含む".into());
        assert!(rules().check(&c).iter().any(|r| r.rule == "modern-vocabulary"));
    }

    #[test]
    fn test_absolute_claim_without_marker_rejects() {
        let mut c = card();
        c.concept_ja = "The rose always cures fever.".into();
        let reasons = rules().check(&c);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].rule, "undisclosed-absolute-claim");
    }

    #[test]
    fn test_absolute_claim_with_marker_accepts() {
        let mut c = card();
        c.concept_ja = "The text says the rose always cures fever [rhetorical].".into();
        assert!(rules().check(&c).is_empty());

        c.concept_ja = "本文はバラが必ず治ると述べる（誇張表現）".into();
        assert!(rules().check(&c).is_empty());
    }

    #[test]
    fn test_marker_in_other_field_does_not_cover_claim() {
        let mut c = card();
        c.concept_ja = "万能の薬とされた".into();
        c.evidence_ja = Some("誇張".into());
        assert!(rules()
            .check(&c)
            .iter()
            .any(|r| r.rule == "undisclosed-absolute-claim"));
    }

    #[test]
    fn test_dosage_rejects() {
        let mut c = card();
        for text in [
            "take 5 mg daily",
            "3g of petals",
            "take 3 grams daily",
            "2 ounces of petals",
            "2.5 drachms",
            "10グラムを煎じる",
        ] {
            c.concept_ja = text.into();
            assert!(
                rules().check(&c).iter().any(|r| r.rule == "precise-dosage"),
                "{} should be a dosage",
                text
            );
        }
    }

    #[test]
    fn test_dosage_ignores_non_units() {
        let mut c = card();
        for text in ["in 2 gradus of heat", "12世紀の写本", "reportedly used for fever"] {
            c.concept_ja = text.into();
            assert!(
                !rules().check(&c).iter().any(|r| r.rule == "precise-dosage"),
                "{} should not be a dosage",
                text
            );
        }
    }

    #[test]
    fn test_dosage_pattern_empty_units() {
        assert!(dosage_pattern(&[]).unwrap().is_none());
    }

    #[test]
    fn test_tag_count_warns_only() {
        let mut c = card();
        c.tags = vec!["herbal".into(), "cooling".into()];
        let reasons = rules().check(&c);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].rule, "tag-count");
        assert_eq!(reasons[0].severity, Severity::Warning);
    }

    #[test]
    fn test_id_format_warns() {
        let mut c = card();
        c.id = "rosa".into();
        let reasons = rules().check(&c);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].rule, "id-format");
        assert!(!reasons[0].is_rejecting());
    }

    #[test]
    fn test_blank_evidence_ref_and_duplicate_tags_warn() {
        let mut c = card();
        c.qa[2].evidence_ref = " ".into();
        c.tags = vec!["herbal".into(), "herbal".into(), "rose".into(), "herbal".into()];
        let rules: Vec<String> = rules().check(&c).into_iter().map(|r| r.rule).collect();
        assert_eq!(rules, vec!["duplicate-tags", "qa-evidence-ref"]);
    }

    #[test]
    fn test_custom_phrase_lists_are_honoured() {
        let policy = PolicyConfig {
            absolute_claims: vec!["panacea".into()],
            rhetorical_markers: vec!["(hyperbole)".into()],
            ..PolicyConfig::default()
        };
        let rules = builtin_rules(&policy).unwrap();
        let mut c = card();
        c.concept_ja = "a panacea".into();
        assert_eq!(rules.check(&c).len(), 1);
        c.concept_ja = "a panacea (hyperbole)".into();
        assert!(rules.check(&c).is_empty());
        c.concept_ja = "always cures".into();
        assert!(rules.check(&c).is_empty());
    }
}

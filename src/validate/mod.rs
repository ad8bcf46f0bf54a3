//! Card record validation
//!
//! A card file is newline-delimited JSON, one card per line. Each line is
//! checked independently:
//!
//! 1. parse (unparseable JSON is a malformed record, never a skipped row)
//! 2. structural checks over the raw value ([`schema`])
//! 3. deserialization into a typed [`Card`]
//! 4. the content-policy [`RuleSet`]
//!
//! A file passes only if every record is accepted and no id repeats.

mod policy;
mod rules;
mod schema;

pub use policy::{
    builtin_rules, AbsoluteClaimRule, DosageRule, DuplicateTagsRule, IdFormatRule,
    ModernVocabularyRule, QaEvidenceRefRule, TagCountRule,
};
pub use rules::{FnRule, PolicyRule, RuleSet};
pub use schema::check_structure;

use crate::config::PolicyConfig;
use crate::error::{Result, ScriptoriumError};
use crate::models::{Card, Reason, Verdict, ViolationKind};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Outcome for one record line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordOutcome {
    /// 1-based line number in the source file
    pub line: usize,
    /// Card id, when the line got far enough to have one
    pub id: Option<String>,
    pub verdict: Verdict,
    /// Rejecting reasons and warnings, in check order
    pub reasons: Vec<Reason>,
}

impl RecordOutcome {
    fn from_reasons(line: usize, id: Option<String>, reasons: Vec<Reason>) -> Self {
        let verdict = if reasons.iter().any(Reason::is_rejecting) {
            Verdict::Reject
        } else {
            Verdict::Accept
        };
        Self {
            line,
            id,
            verdict,
            reasons,
        }
    }

    pub fn accepted(&self) -> bool {
        self.verdict == Verdict::Accept
    }

    /// True when the record needs structural repair, not rewording.
    pub fn is_malformed(&self) -> bool {
        self.reasons
            .iter()
            .any(|r| r.is_rejecting() && r.kind == ViolationKind::Malformed)
    }

    pub fn rejections(&self) -> impl Iterator<Item = &Reason> {
        self.reasons.iter().filter(|r| r.is_rejecting())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Reason> {
        self.reasons.iter().filter(|r| !r.is_rejecting())
    }
}

/// An id used by more than one record in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateId {
    pub id: String,
    pub lines: Vec<usize>,
}

/// Validation results for one card file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub records: Vec<RecordOutcome>,
    pub duplicate_ids: Vec<DuplicateId>,
}

impl FileReport {
    /// All-or-nothing acceptance gate for the file.
    pub fn passed(&self) -> bool {
        self.duplicate_ids.is_empty() && self.records.iter().all(RecordOutcome::accepted)
    }

    pub fn accepted_count(&self) -> usize {
        self.records.iter().filter(|r| r.accepted()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.records.len() - self.accepted_count()
    }

    pub fn malformed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_malformed()).count()
    }

    /// Rejected records whose problems are wording only.
    pub fn policy_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.accepted() && !r.is_malformed())
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.records.iter().map(|r| r.warnings().count()).sum()
    }
}

/// Results across every file of one `validate` invocation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationSummary {
    pub files: Vec<FileReport>,
}

impl ValidationSummary {
    pub fn passed(&self) -> bool {
        self.files.iter().all(FileReport::passed)
    }

    pub fn total_records(&self) -> usize {
        self.files.iter().map(|f| f.records.len()).sum()
    }

    pub fn total_rejected(&self) -> usize {
        self.files.iter().map(FileReport::rejected_count).sum()
    }
}

/// Validates card records against an immutable policy.
#[derive(Debug)]
pub struct Validator {
    policy: PolicyConfig,
    rules: RuleSet,
}

impl Validator {
    /// Construct with the built-in rule set for this policy.
    pub fn new(policy: PolicyConfig) -> Result<Self> {
        let rules = builtin_rules(&policy)?;
        Ok(Self { policy, rules })
    }

    /// Construct with a caller-assembled rule set.
    pub fn with_rules(policy: PolicyConfig, rules: RuleSet) -> Self {
        Self { policy, rules }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate one non-blank line of a card file.
    pub fn validate_line(&self, line_no: usize, line: &str) -> RecordOutcome {
        match serde_json::from_str::<Value>(line) {
            Ok(value) => self.validate_value(line_no, &value),
            Err(e) => RecordOutcome::from_reasons(
                line_no,
                None,
                vec![Reason::malformed("parse", format!("unparseable JSON: {}", e))],
            ),
        }
    }

    /// Validate an already-parsed record.
    pub fn validate_value(&self, line_no: usize, value: &Value) -> RecordOutcome {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut reasons = check_structure(value);
        let structurally_sound = !reasons
            .iter()
            .any(|r| r.kind == ViolationKind::Malformed);

        if structurally_sound {
            match serde_json::from_value::<Card>(value.clone()) {
                Ok(card) => reasons.extend(self.rules.check(&card)),
                Err(e) => reasons.push(Reason::malformed("structure", e.to_string())),
            }
        }

        RecordOutcome::from_reasons(line_no, id, reasons)
    }

    /// Run only the policy rules over a typed card.
    pub fn check_card(&self, card: &Card) -> Vec<Reason> {
        self.rules.check(card)
    }

    /// Validate the full contents of a card file. Blank lines are skipped.
    pub fn validate_str(&self, name: &str, content: &str) -> FileReport {
        let records: Vec<RecordOutcome> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| self.validate_line(i + 1, line.trim()))
            .collect();

        let duplicate_ids = find_duplicate_ids(&records);
        let report = FileReport {
            path: name.to_string(),
            records,
            duplicate_ids,
        };
        debug!(
            "{}: {} records, {} rejected, {} duplicate ids",
            name,
            report.records.len(),
            report.rejected_count(),
            report.duplicate_ids.len()
        );
        report
    }

    /// Read and validate a card file.
    pub fn validate_file(&self, path: &Path) -> Result<FileReport> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ScriptoriumError::io(path, e))?;
        let report = self.validate_str(&path.display().to_string(), &content);
        info!(
            "validated {} ({} records, {})",
            path.display(),
            report.records.len(),
            if report.passed() { "pass" } else { "fail" }
        );
        Ok(report)
    }

    pub fn validate_files(&self, paths: &[impl AsRef<Path>]) -> Result<ValidationSummary> {
        let files = paths
            .iter()
            .map(|p| self.validate_file(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(ValidationSummary { files })
    }
}

fn find_duplicate_ids(records: &[RecordOutcome]) -> Vec<DuplicateId> {
    let mut by_id: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for record in records {
        if let Some(id) = record.id.as_deref() {
            by_id.entry(id).or_default().push(record.line);
        }
    }
    by_id
        .into_iter()
        .filter(|(_, lines)| lines.len() > 1)
        .map(|(id, lines)| DuplicateId {
            id: id.to_string(),
            lines,
        })
        .collect()
}

/// Read every card from a card file, failing on the first unparseable line.
///
/// Used by the generator, which needs cards but does not judge them.
pub fn read_cards(path: &Path) -> Result<Vec<Card>> {
    let content = std::fs::read_to_string(path).map_err(|e| ScriptoriumError::io(path, e))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<Card>(line.trim()).map_err(|e| ScriptoriumError::CardParse {
                path: path.to_path_buf(),
                line: i + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

//! Project-level configuration support
//!
//! Loads per-project configuration from `scriptorium.toml` in the working
//! directory, or from an explicit `--config` path.
//!
//! # Configuration Format
//!
//! ```toml
//! # scriptorium.toml
//!
//! [policy]
//! modern_terms = ["antioxidant", "抗酸化"]
//! absolute_claims = ["always cures", "必ず治る"]
//! rhetorical_markers = ["[rhetorical]", "誇張"]
//! min_tags = 3
//! max_tags = 6
//!
//! [generator]
//! seed = 42
//! lines_per_card = 5
//! words_per_line = 8
//! seed_weight = 25.0
//!
//! [corpus]
//! max_lines = 20000
//!
//! [scoring]
//! metric = "js_bigram"
//! ```

use crate::error::{Result, ScriptoriumError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "scriptorium.toml";

/// Project-level configuration loaded from scriptorium.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Content-policy vocabulary and tag limits for the validator
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Sequence generation parameters
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Reference corpus extraction/loading
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Similarity scoring
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl ProjectConfig {
    /// Reject parameter values no run could use.
    pub fn validate(&self) -> Result<()> {
        if self.policy.min_tags > self.policy.max_tags {
            return Err(ScriptoriumError::Config(format!(
                "policy.min_tags ({}) exceeds policy.max_tags ({})",
                self.policy.min_tags, self.policy.max_tags
            )));
        }
        if self.generator.lines_per_card == 0 {
            return Err(ScriptoriumError::Config(
                "generator.lines_per_card must be at least 1".into(),
            ));
        }
        if self.generator.words_per_line == 0 {
            return Err(ScriptoriumError::Config(
                "generator.words_per_line must be at least 1".into(),
            ));
        }
        if !self.generator.seed_weight.is_finite() || self.generator.seed_weight < 0.0 {
            return Err(ScriptoriumError::Config(format!(
                "generator.seed_weight must be a finite non-negative number, got {}",
                self.generator.seed_weight
            )));
        }
        if self.corpus.max_lines == 0 {
            return Err(ScriptoriumError::Config(
                "corpus.max_lines must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Vocabulary lists and limits for the content-policy rules.
///
/// Matching is case-insensitive substring matching over the scanned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Modern clinical/chemical vocabulary that must not appear
    #[serde(default = "default_modern_terms")]
    pub modern_terms: Vec<String>,

    /// Absolute-certainty phrases that need a rhetorical marker alongside
    #[serde(default = "default_absolute_claims")]
    pub absolute_claims: Vec<String>,

    /// Markers that flag an absolute claim as period rhetoric
    #[serde(default = "default_rhetorical_markers")]
    pub rhetorical_markers: Vec<String>,

    /// Units that turn "number + unit" into a dosage assertion
    #[serde(default = "default_dosage_units")]
    pub dosage_units: Vec<String>,

    /// Card fields the policy rules scan
    #[serde(default = "default_scan_fields")]
    pub scan_fields: Vec<String>,

    #[serde(default = "default_min_tags")]
    pub min_tags: usize,

    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            modern_terms: default_modern_terms(),
            absolute_claims: default_absolute_claims(),
            rhetorical_markers: default_rhetorical_markers(),
            dosage_units: default_dosage_units(),
            scan_fields: default_scan_fields(),
            min_tags: default_min_tags(),
            max_tags: default_max_tags(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_modern_terms() -> Vec<String> {
    strings(&[
        "antibacterial",
        "antioxidant",
        "anti-inflammatory",
        "vitamin",
        "clinical trial",
        "placebo",
        "dopamine",
        "serotonin",
        "cortisol",
        "polyphenol",
        "flavonoid",
        "molecule",
        "抗菌",
        "抗酸化",
        "抗炎症",
        "ビタミン",
        "臨床試験",
        "ドーパミン",
        "セロトニン",
        "ポリフェノール",
        "フラボノイド",
        "分子",
        "化合物",
    ])
}

fn default_absolute_claims() -> Vec<String> {
    strings(&[
        "always cures",
        "cures all",
        "never fails",
        "guaranteed",
        "certainly heals",
        "必ず治る",
        "万能",
        "確実に効く",
        "絶対に効く",
    ])
}

fn default_rhetorical_markers() -> Vec<String> {
    strings(&["[rhetorical]", "rhetorical", "overstatement", "誇張", "修辞"])
}

fn default_dosage_units() -> Vec<String> {
    strings(&[
        "mg", "ml", "g", "grams", "gram", "ounces", "ounce", "drachms", "drachm", "グラム",
        "ミリグラム", "ミリリットル", "匁",
    ])
}

fn default_scan_fields() -> Vec<String> {
    strings(&["concept_ja", "evidence_ja"])
}

fn default_min_tags() -> usize {
    3
}

fn default_max_tags() -> usize {
    6
}

/// Parameters for the seeded sequence generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base RNG seed; identical seeds reproduce identical runs
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_lines_per_card")]
    pub lines_per_card: usize,

    #[serde(default = "default_words_per_line")]
    pub words_per_line: usize,

    /// Weight applied to seed-text transition counts when folded into the model
    #[serde(default = "default_seed_weight")]
    pub seed_weight: f64,

    /// Default stream (A or B)
    #[serde(default = "default_stream")]
    pub stream: String,

    /// Default seed mode (normal or neutral)
    #[serde(default = "default_seed_mode")]
    pub seed_mode: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            lines_per_card: default_lines_per_card(),
            words_per_line: default_words_per_line(),
            seed_weight: default_seed_weight(),
            stream: default_stream(),
            seed_mode: default_seed_mode(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_lines_per_card() -> usize {
    5
}

fn default_words_per_line() -> usize {
    8
}

fn default_seed_weight() -> f64 {
    25.0
}

fn default_stream() -> String {
    "A".to_string()
}

fn default_seed_mode() -> String {
    "normal".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Cap on extracted/loaded reference lines
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
        }
    }
}

fn default_max_lines() -> usize {
    20_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Headline metric: js_bigram, js_unigram or cosine_trigram
    #[serde(default = "default_metric")]
    pub metric: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            metric: default_metric(),
        }
    }
}

fn default_metric() -> String {
    "js_bigram".to_string()
}

/// Load project configuration from `dir/scriptorium.toml`.
///
/// A missing or unreadable file falls back to defaults with a warning.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let toml_path = dir.join(CONFIG_FILE_NAME);
    if toml_path.exists() {
        match load_config_file(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from an explicit TOML file. Errors are fatal.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ScriptoriumError::io(path, e))?;
    let config: ProjectConfig = toml::from_str(&content)
        .map_err(|e| ScriptoriumError::Config(format!("{}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Commented template written by `scriptorium init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Scriptorium configuration

[policy]
# Modern clinical/chemical vocabulary rejected in concept_ja / evidence_ja
modern_terms = [
    "antibacterial", "antioxidant", "anti-inflammatory", "vitamin", "clinical trial",
    "placebo", "dopamine", "serotonin", "cortisol", "polyphenol", "flavonoid", "molecule",
    "抗菌", "抗酸化", "抗炎症", "ビタミン", "臨床試験", "ドーパミン", "セロトニン",
    "ポリフェノール", "フラボノイド", "分子", "化合物",
]

# Absolute-certainty phrases; allowed only next to a rhetorical marker
absolute_claims = [
    "always cures", "cures all", "never fails", "guaranteed", "certainly heals",
    "必ず治る", "万能", "確実に効く", "絶対に効く",
]
rhetorical_markers = ["[rhetorical]", "rhetorical", "overstatement", "誇張", "修辞"]

# "number + unit" in a scanned field counts as a dosage assertion
dosage_units = [
    "mg", "ml", "g", "grams", "gram", "ounces", "ounce", "drachms", "drachm",
    "グラム", "ミリグラム", "ミリリットル", "匁",
]

scan_fields = ["concept_ja", "evidence_ja"]
min_tags = 3
max_tags = 6

[generator]
seed = 42
lines_per_card = 5
words_per_line = 8
# Weight of card seed text relative to one corpus occurrence
seed_weight = 25.0
stream = "A"        # A or B
seed_mode = "normal" # normal or neutral

[corpus]
max_lines = 20000

[scoring]
# js_bigram, js_unigram or cosine_trigram
metric = "js_bigram"
"#;

#[cfg(test)]
mod tests;

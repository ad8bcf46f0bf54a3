//! Distributional similarity between two texts
//!
//! All metrics work on character n-grams of normalized text (see
//! [`crate::corpus::normalize_symbols`]) and land in `[0, 1]`, higher meaning
//! more alike:
//!
//! - `js_unigram` / `js_bigram`: 1 minus the base-2 Jensen-Shannon
//!   divergence of the unigram / bigram distributions
//! - `cosine_trigram`: cosine of the raw trigram count vectors

use crate::corpus::normalize_symbols;
use crate::error::ScriptoriumError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Adjacent-symbol transition distribution
    #[default]
    JsBigram,
    JsUnigram,
    CosineTrigram,
}

impl Metric {
    pub fn all() -> &'static [Metric] {
        &[Metric::JsBigram, Metric::JsUnigram, Metric::CosineTrigram]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::JsBigram => "js_bigram",
            Metric::JsUnigram => "js_unigram",
            Metric::CosineTrigram => "cosine_trigram",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ScriptoriumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "js_bigram" => Ok(Metric::JsBigram),
            "js_unigram" => Ok(Metric::JsUnigram),
            "cosine_trigram" => Ok(Metric::CosineTrigram),
            _ => Err(ScriptoriumError::UnknownMetric(s.to_string())),
        }
    }
}

/// Every metric for one pair of texts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityScores {
    pub js_unigram: f64,
    pub js_bigram: f64,
    pub cosine_trigram: f64,
}

impl SimilarityScores {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::JsBigram => self.js_bigram,
            Metric::JsUnigram => self.js_unigram,
            Metric::CosineTrigram => self.cosine_trigram,
        }
    }
}

/// Scores for two arbitrary text files, as produced by `scriptorium score`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub reference: String,
    pub generated: String,
    pub metric: Metric,
    pub score: f64,
    pub scores: SimilarityScores,
}

impl ScoreReport {
    pub fn new(reference: &str, generated: &str, reference_text: &str, generated_text: &str, metric: Metric) -> Self {
        let scores = score(reference_text, generated_text);
        Self {
            reference: reference.to_string(),
            generated: generated.to_string(),
            metric,
            score: scores.get(metric),
            scores,
        }
    }
}

/// Character n-gram counts of normalized text. Empty when the text is
/// shorter than `n`.
pub fn char_ngrams(text: &str, n: usize) -> BTreeMap<String, usize> {
    let chars: Vec<char> = normalize_symbols(text).chars().collect();
    let mut counts = BTreeMap::new();
    if n == 0 || chars.len() < n {
        return counts;
    }
    for window in chars.windows(n) {
        *counts.entry(window.iter().collect::<String>()).or_insert(0) += 1;
    }
    counts
}

/// Counts to probabilities.
pub fn distribution(counts: &BTreeMap<String, usize>) -> BTreeMap<String, f64> {
    let total: usize = counts.values().sum();
    let total = total.max(1) as f64;
    counts
        .iter()
        .map(|(k, &v)| (k.clone(), v as f64 / total))
        .collect()
}

fn kl_to_mixture(p: &BTreeMap<String, f64>, m: &BTreeMap<String, f64>) -> f64 {
    p.iter()
        .filter(|&(_, &pv)| pv > 0.0)
        .filter_map(|(k, &pv)| {
            let mv = m.get(k).copied().unwrap_or(0.0);
            (mv > 0.0).then(|| pv * (pv / mv).log2())
        })
        .sum()
}

/// Base-2 Jensen-Shannon divergence, in `[0, 1]`.
pub fn js_divergence(p: &BTreeMap<String, f64>, q: &BTreeMap<String, f64>) -> f64 {
    let mut mixture: BTreeMap<String, f64> = BTreeMap::new();
    for (k, v) in p.iter().chain(q.iter()) {
        *mixture.entry(k.clone()).or_insert(0.0) += 0.5 * v;
    }
    let divergence = 0.5 * kl_to_mixture(p, &mixture) + 0.5 * kl_to_mixture(q, &mixture);
    divergence.clamp(0.0, 1.0)
}

/// Cosine similarity of two count vectors, `0.0` if either is empty.
pub fn cosine(a: &BTreeMap<String, usize>, b: &BTreeMap<String, usize>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(k, &av)| b.get(k).map(|&bv| av as f64 * bv as f64))
        .sum();
    // an empty sum is -0.0
    if dot <= 0.0 {
        return 0.0;
    }
    let norm = |c: &BTreeMap<String, usize>| {
        let n = c.values().map(|&v| (v as f64) * (v as f64)).sum::<f64>().sqrt();
        if n > 0.0 {
            n
        } else {
            1.0
        }
    };
    (dot / (norm(a) * norm(b))).clamp(0.0, 1.0)
}

fn js_similarity(reference: &str, generated: &str, n: usize) -> f64 {
    let p = distribution(&char_ngrams(reference, n));
    let q = distribution(&char_ngrams(generated, n));
    1.0 - js_divergence(&p, &q)
}

/// Score `generated` against `reference` on every metric.
pub fn score(reference: &str, generated: &str) -> SimilarityScores {
    SimilarityScores {
        js_unigram: js_similarity(reference, generated, 1),
        js_bigram: js_similarity(reference, generated, 2),
        cosine_trigram: cosine(&char_ngrams(reference, 3), &char_ngrams(generated, 3)),
    }
}

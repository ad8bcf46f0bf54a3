//! Character transition model over corpus words
//!
//! Builds order-1 character statistics from reference lines. Each word is
//! framed as `^word$` so the model also learns how words start and end, and
//! a separate starter table records the first two letters of every word.
//! No training in the ML sense: counts only.

use serde_json::json;
use std::collections::BTreeMap;

/// Word-start boundary symbol
pub const WORD_START: char = '^';
/// Word-end boundary symbol
pub const WORD_END: char = '$';

/// Next-symbol weights for one context symbol. Unnormalized.
pub type TransitionTable = BTreeMap<char, f64>;

/// Smoothing constant for surprisal
const SMOOTHING_K: f64 = 0.1;

/// Split a line into model words: dots and whitespace separate words,
/// anything outside `[a-z]` is dropped, and words under two letters are
/// ignored.
pub fn corpus_words(line: &str) -> Vec<String> {
    line.to_lowercase()
        .split(|c: char| c == '.' || c.is_whitespace())
        .map(|w| w.chars().filter(|c| c.is_ascii_lowercase()).collect::<String>())
        .filter(|w| w.len() >= 2)
        .collect()
}

/// Order-1 character transition counts with word boundaries.
///
/// Ordered maps keep sampling order, and therefore seeded output, stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionModel {
    /// Context symbol -> next symbol -> weight
    transitions: BTreeMap<char, TransitionTable>,
    /// Two-letter word openings -> weight
    starters: BTreeMap<String, f64>,
    /// Words absorbed (unweighted count)
    words_seen: usize,
}

impl TransitionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from reference corpus lines at unit weight.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut model = Self::new();
        for line in lines {
            model.train_on_text(line.as_ref(), 1.0);
        }
        model
    }

    /// Fold a text's transitions into the model, each occurrence counting
    /// `weight`. Returns the number of words absorbed.
    pub fn train_on_text(&mut self, text: &str, weight: f64) -> usize {
        if weight <= 0.0 {
            return 0;
        }
        let words = corpus_words(text);
        for word in &words {
            self.train_on_word(word, weight);
        }
        words.len()
    }

    fn train_on_word(&mut self, word: &str, weight: f64) {
        let starter: String = word.chars().take(2).collect();
        *self.starters.entry(starter).or_insert(0.0) += weight;

        let framed: Vec<char> = std::iter::once(WORD_START)
            .chain(word.chars())
            .chain(std::iter::once(WORD_END))
            .collect();
        for pair in framed.windows(2) {
            *self
                .transitions
                .entry(pair[0])
                .or_default()
                .entry(pair[1])
                .or_insert(0.0) += weight;
        }
        self.words_seen += 1;
    }

    /// Next-symbol weights after `prev`, if the model has seen it.
    pub fn successors(&self, prev: char) -> Option<&TransitionTable> {
        self.transitions.get(&prev).filter(|t| !t.is_empty())
    }

    pub fn starters(&self) -> &BTreeMap<String, f64> {
        &self.starters
    }

    pub fn has_starter(&self, opening: &str) -> bool {
        self.starters.contains_key(opening)
    }

    /// Normalized transition probability, `0.0` for unseen pairs.
    pub fn probability(&self, prev: char, next: char) -> f64 {
        let Some(table) = self.transitions.get(&prev) else {
            return 0.0;
        };
        let total: f64 = table.values().sum();
        if total <= 0.0 {
            return 0.0;
        }
        table.get(&next).copied().unwrap_or(0.0) / total
    }

    /// Average bits per transition of `text` under the model, with add-k
    /// smoothing so unseen pairs cost a finite amount.
    pub fn surprisal(&self, text: &str) -> f64 {
        let vocab = self.vocab_size().max(1) as f64;
        let mut total = 0.0;
        let mut count = 0usize;
        for word in corpus_words(text) {
            let framed: Vec<char> = std::iter::once(WORD_START)
                .chain(word.chars())
                .chain(std::iter::once(WORD_END))
                .collect();
            for pair in framed.windows(2) {
                let (pair_weight, context_weight) = match self.transitions.get(&pair[0]) {
                    Some(table) => (
                        table.get(&pair[1]).copied().unwrap_or(0.0),
                        table.values().sum::<f64>(),
                    ),
                    None => (0.0, 0.0),
                };
                let prob = (pair_weight + SMOOTHING_K) / (context_weight + SMOOTHING_K * vocab);
                total += -prob.log2();
                count += 1;
            }
        }
        if count > 0 {
            total / count as f64
        } else {
            0.0
        }
    }

    pub fn words_seen(&self) -> usize {
        self.words_seen
    }

    /// Distinct symbols seen in any position.
    pub fn vocab_size(&self) -> usize {
        let mut symbols: std::collections::BTreeSet<char> = self.transitions.keys().copied().collect();
        for table in self.transitions.values() {
            symbols.extend(table.keys().copied());
        }
        symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starters.is_empty()
    }

    /// Model size summary for reports
    pub fn stats_json(&self) -> serde_json::Value {
        json!({
            "words_seen": self.words_seen,
            "contexts": self.transitions.len(),
            "starters": self.starters.len(),
            "vocab_size": self.vocab_size(),
        })
    }
}

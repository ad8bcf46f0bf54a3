//! Stream bias and seed mode selectors

use super::markov::TransitionTable;
use crate::error::ScriptoriumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named, fixed bias over next-symbol probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stream {
    /// Favors `q` and `o` (the q- prefix feel)
    A,
    /// Favors `c`, `h`, `s`, `e`, `y` (the ch/sh feel)
    B,
}

impl Stream {
    pub fn all() -> &'static [Stream] {
        &[Stream::A, Stream::B]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stream::A => "A",
            Stream::B => "B",
        }
    }

    /// Multiplicative weight per favored symbol.
    pub fn bias(&self) -> &'static [(char, f64)] {
        match self {
            Stream::A => &[('q', 1.25), ('o', 1.25)],
            Stream::B => &[('c', 1.20), ('h', 1.20), ('s', 1.20), ('e', 1.20), ('y', 1.20)],
        }
    }

    /// Apply the bias to a successor table and renormalize.
    ///
    /// Returns the table unchanged (normalized) if it sums to zero after
    /// biasing.
    pub fn apply(&self, table: &TransitionTable) -> Vec<(char, f64)> {
        let biased: Vec<(char, f64)> = table
            .iter()
            .map(|(&symbol, &weight)| {
                let factor = self
                    .bias()
                    .iter()
                    .find(|(c, _)| *c == symbol)
                    .map_or(1.0, |(_, f)| *f);
                (symbol, weight * factor)
            })
            .collect();
        normalize(biased).unwrap_or_else(|| {
            normalize(table.iter().map(|(&c, &w)| (c, w)).collect()).unwrap_or_default()
        })
    }
}

fn normalize(entries: Vec<(char, f64)>) -> Option<Vec<(char, f64)>> {
    let total: f64 = entries.iter().map(|(_, w)| w).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    Some(entries.into_iter().map(|(c, w)| (c, w / total)).collect())
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stream {
    type Err = ScriptoriumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Stream::A),
            "B" => Ok(Stream::B),
            _ => Err(ScriptoriumError::UnknownStream(s.to_string())),
        }
    }
}

/// Whether card content seeds generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// Card evidence and source text feed the model and the RNG
    Normal,
    /// Evidence and source are blanked, isolating their effect
    Neutral,
}

impl SeedMode {
    pub fn name(&self) -> &'static str {
        match self {
            SeedMode::Normal => "normal",
            SeedMode::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeedMode {
    type Err = ScriptoriumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(SeedMode::Normal),
            "neutral" => Ok(SeedMode::Neutral),
            _ => Err(ScriptoriumError::UnknownSeedMode(s.to_string())),
        }
    }
}

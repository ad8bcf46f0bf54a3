//! Seeded word and line sampling from a transition model

use super::markov::{TransitionModel, WORD_END, WORD_START};
use super::stream::Stream;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Shortest word the sampler aims for
const MIN_WORD_LEN: usize = 3;
/// Hard cap so a model without end transitions cannot loop forever
const MAX_WORD_LEN: usize = 24;
/// Chance a word is followed by a `.` separator
const DOT_PROBABILITY: f64 = 0.12;
/// Standard deviation of the word-length jitter
const LENGTH_STDDEV: f64 = 1.2;

/// Pick an entry with probability proportional to its weight.
///
/// Entries are visited in the order given, so ordered inputs give
/// reproducible picks for a seeded RNG.
pub fn weighted_choice<K, I>(entries: I, rng: &mut ChaCha8Rng) -> Option<K>
where
    I: IntoIterator<Item = (K, f64)>,
{
    let entries: Vec<(K, f64)> = entries.into_iter().filter(|(_, w)| *w > 0.0).collect();
    let total: f64 = entries.iter().map(|(_, w)| w).sum();
    if entries.is_empty() || total <= 0.0 {
        return None;
    }
    let target = rng.random::<f64>() * total;
    let mut acc = 0.0;
    let last = entries.len() - 1;
    for (i, (key, weight)) in entries.into_iter().enumerate() {
        acc += weight;
        if target < acc || i == last {
            return Some(key);
        }
    }
    None
}

/// Roughly normal jitter (Irwin-Hall over three uniforms).
fn length_jitter(rng: &mut ChaCha8Rng) -> f64 {
    let sum: f64 = (0..3).map(|_| rng.random::<f64>()).sum();
    (sum - 1.5) * 2.0 * LENGTH_STDDEV
}

/// Draws words and lines from a model under a fixed stream bias.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'m> {
    model: &'m TransitionModel,
    stream: Stream,
}

impl<'m> Sampler<'m> {
    pub fn new(model: &'m TransitionModel, stream: Stream) -> Self {
        Self { model, stream }
    }

    /// Sample one word of roughly `target_len` letters.
    ///
    /// `start_hint` is used as the opening pair when the model knows it.
    pub fn word(&self, rng: &mut ChaCha8Rng, target_len: usize, start_hint: Option<&str>) -> String {
        let opening = match start_hint.filter(|h| self.model.has_starter(h)) {
            Some(hint) => hint.to_string(),
            None => match weighted_choice(
                self.model.starters().iter().map(|(k, &w)| (k.clone(), w)),
                rng,
            ) {
                Some(opening) => opening,
                None => return String::new(),
            },
        };

        let mut word = opening;
        let Some(mut prev) = word.chars().last() else {
            return word;
        };
        let target_len = target_len.clamp(MIN_WORD_LEN, MAX_WORD_LEN);
        while word.len() < target_len {
            let Some(table) = self.model.successors(prev) else {
                break;
            };
            let Some(next) = weighted_choice(self.stream.apply(table), rng) else {
                break;
            };
            if next == WORD_END || next == WORD_START {
                break;
            }
            word.push(next);
            prev = next;
        }
        word
    }

    /// Sample a line of `words` words around a base length.
    pub fn line(
        &self,
        rng: &mut ChaCha8Rng,
        words: usize,
        base_len: usize,
        start_hint: Option<&str>,
    ) -> String {
        let mut tokens = Vec::with_capacity(words);
        for _ in 0..words {
            let target = (base_len as f64 + length_jitter(rng)).round().max(MIN_WORD_LEN as f64);
            let mut word = self.word(rng, target as usize, start_hint);
            if rng.random::<f64>() < DOT_PROBABILITY {
                word.push('.');
            }
            tokens.push(word);
        }
        tokens.join(" ")
    }
}

//! Seeded pseudo-text generation and scoring
//!
//! One run:
//!
//! 1. build a [`TransitionModel`] from the reference corpus
//! 2. fold in card seed text at `seed_weight` (normal mode only; neutral
//!    seed text is empty)
//! 3. per card, seed a ChaCha RNG from the base seed and the card's seed
//!    string, then draw `lines_per_card` lines under the stream bias
//! 4. score the generated text against the reference corpus
//!
//! Runs are pure functions of their inputs: same corpus, cards, stream,
//! seed mode and seed give byte-identical lines and identical scores.

mod markov;
mod sampler;
mod seed;
mod stream;

pub use markov::{corpus_words, TransitionModel, TransitionTable, WORD_END, WORD_START};
pub use sampler::{weighted_choice, Sampler};
pub use seed::{fnv1a, seed_text, CardSeed};
pub use stream::{SeedMode, Stream};

use crate::config::ProjectConfig;
use crate::corpus::ReferenceCorpus;
use crate::error::{Result, ScriptoriumError};
use crate::models::Card;
use crate::similarity::{self, Metric, SimilarityScores};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::debug;

/// Base word length before the per-card offset
const BASE_WORD_LEN: usize = 4;
/// Per-card word-length offsets span `0..WORD_LEN_SPREAD`
const WORD_LEN_SPREAD: u32 = 5;

/// Parameters for a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub stream: Stream,
    pub seed_mode: SeedMode,
    pub seed: u64,
    pub lines_per_card: usize,
    pub words_per_line: usize,
    pub seed_weight: f64,
    pub metric: Metric,
}

impl GenerationOptions {
    /// Resolve options from configuration; unknown names are fatal.
    pub fn from_config(config: &ProjectConfig) -> Result<Self> {
        config.validate()?;
        let generator = &config.generator;
        Ok(Self {
            stream: generator.stream.parse()?,
            seed_mode: generator.seed_mode.parse()?,
            seed: generator.seed,
            lines_per_card: generator.lines_per_card,
            words_per_line: generator.words_per_line,
            seed_weight: generator.seed_weight,
            metric: config.scoring.metric.parse()?,
        })
    }

    pub fn with_seed_mode(&self, seed_mode: SeedMode) -> Self {
        Self {
            seed_mode,
            ..self.clone()
        }
    }

    fn check(&self) -> Result<()> {
        if self.lines_per_card == 0 || self.words_per_line == 0 {
            return Err(ScriptoriumError::Config(
                "lines_per_card and words_per_line must be at least 1".into(),
            ));
        }
        if !self.seed_weight.is_finite() || self.seed_weight < 0.0 {
            return Err(ScriptoriumError::Config(format!(
                "seed_weight must be a finite non-negative number, got {}",
                self.seed_weight
            )));
        }
        Ok(())
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            stream: Stream::A,
            seed_mode: SeedMode::Normal,
            seed: 42,
            lines_per_card: 5,
            words_per_line: 8,
            seed_weight: 25.0,
            metric: Metric::JsBigram,
        }
    }
}

/// Result of one generation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRun {
    pub stream: Stream,
    pub seed_mode: SeedMode,
    pub seed: u64,
    pub metric: Metric,
    /// Headline likeness score (the configured metric)
    pub score: f64,
    pub scores: SimilarityScores,
    /// Average bits per transition of the output under the reference-only model
    pub surprisal: f64,
    pub corpus_lines: usize,
    pub cards: usize,
    /// Letters of seed text folded into the model
    pub seed_chars: usize,
    pub lines: Vec<String>,
}

impl GenerationRun {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Normal and neutral runs over identical inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub normal: GenerationRun,
    pub neutral: GenerationRun,
    /// `normal.score - neutral.score`
    pub delta: f64,
}

/// Generate and score one run.
pub fn run(corpus: &ReferenceCorpus, cards: &[Card], options: &GenerationOptions) -> Result<GenerationRun> {
    options.check()?;

    let reference_model = TransitionModel::from_lines(corpus.lines());
    if reference_model.is_empty() {
        return Err(ScriptoriumError::Config(
            "reference corpus has no words of two or more letters".into(),
        ));
    }

    let seed_material = seed_text(cards, options.seed_mode);
    let mut model = reference_model.clone();
    model.train_on_text(&seed_material, options.seed_weight);
    debug!(
        "stream {} / {}: {} seed chars folded, model {}",
        options.stream,
        options.seed_mode,
        seed_material.len(),
        model.stats_json()
    );

    let sampler = Sampler::new(&model, options.stream);
    let mut lines = Vec::with_capacity(cards.len().max(1) * options.lines_per_card);

    if cards.is_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
        let base_len = BASE_WORD_LEN + (options.seed % WORD_LEN_SPREAD as u64) as usize;
        for _ in 0..options.lines_per_card {
            lines.push(sampler.line(&mut rng, options.words_per_line, base_len, None));
        }
    }

    for card in cards {
        let card_seed = CardSeed::new(card, options.seed_mode);
        let hash = card_seed.hash();
        let mut rng = ChaCha8Rng::seed_from_u64(options.seed ^ u64::from(hash));
        let base_len = BASE_WORD_LEN + (hash % WORD_LEN_SPREAD) as usize;
        let hint = card_seed.start_hint();
        for _ in 0..options.lines_per_card {
            lines.push(sampler.line(
                &mut rng,
                options.words_per_line,
                base_len,
                hint.as_deref(),
            ));
        }
    }

    let reference_text = corpus.text();
    let generated_text = lines.join("\n");
    let scores = similarity::score(&reference_text, &generated_text);

    Ok(GenerationRun {
        stream: options.stream,
        seed_mode: options.seed_mode,
        seed: options.seed,
        metric: options.metric,
        score: scores.get(options.metric),
        scores,
        surprisal: reference_model.surprisal(&generated_text),
        corpus_lines: corpus.len(),
        cards: cards.len(),
        seed_chars: seed_material.chars().filter(char::is_ascii_alphabetic).count(),
        lines,
    })
}

/// Run normal and neutral seeding with everything else held fixed.
pub fn compare(corpus: &ReferenceCorpus, cards: &[Card], options: &GenerationOptions) -> Result<Comparison> {
    let normal = run(corpus, cards, &options.with_seed_mode(SeedMode::Normal))?;
    let neutral = run(corpus, cards, &options.with_seed_mode(SeedMode::Neutral))?;
    let delta = normal.score - neutral.score;
    Ok(Comparison {
        normal,
        neutral,
        delta,
    })
}

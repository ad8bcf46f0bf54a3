//! Generate and compare commands - seeded pseudo-text and its likeness score

use super::{emit, parse_format, GenerationArgs};
use anyhow::{Context, Result};
use scriptorium::config::ProjectConfig;
use scriptorium::corpus::ReferenceCorpus;
use scriptorium::generate::{self, GenerationOptions};
use scriptorium::models::Card;
use scriptorium::reporters::Report;
use scriptorium::validate::read_cards;
use tracing::info;

/// Resolve options, corpus and cards. Everything here is fatal.
fn prepare(
    mut config: ProjectConfig,
    args: &GenerationArgs,
    seed_mode: Option<&str>,
) -> Result<(GenerationOptions, ReferenceCorpus, Vec<Card>)> {
    args.apply_to(&mut config);
    if let Some(mode) = seed_mode {
        config.generator.seed_mode = mode.to_string();
    }
    let options = GenerationOptions::from_config(&config)?;

    let corpus = ReferenceCorpus::load(&args.reference, config.corpus.max_lines)?;
    let mut cards = Vec::new();
    for path in &args.cards {
        let loaded =
            read_cards(path).with_context(|| format!("Failed to load cards from {}", path.display()))?;
        cards.extend(loaded);
    }
    info!(
        "{} reference lines, {} cards, stream {}, seed {}",
        corpus.len(),
        cards.len(),
        options.stream,
        options.seed
    );
    Ok((options, corpus, cards))
}

pub fn run(config: ProjectConfig, args: &GenerationArgs, seed_mode: Option<&str>) -> Result<()> {
    let format = parse_format(&args.format)?;
    let (options, corpus, cards) = prepare(config, args, seed_mode)?;
    let run = generate::run(&corpus, &cards, &options)?;
    emit(Report::Generation(&run), format, args.output.as_deref())
}

pub fn compare(config: ProjectConfig, args: &GenerationArgs) -> Result<()> {
    let format = parse_format(&args.format)?;
    let (options, corpus, cards) = prepare(config, args, None)?;
    let comparison = generate::compare(&corpus, &cards, &options)?;
    emit(Report::Comparison(&comparison), format, args.output.as_deref())
}

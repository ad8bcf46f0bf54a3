//! Score command - similarity between two text files

use super::{emit, parse_format};
use anyhow::{Context, Result};
use scriptorium::config::ProjectConfig;
use scriptorium::corpus::ReferenceCorpus;
use scriptorium::reporters::Report;
use scriptorium::similarity::{Metric, ScoreReport};
use std::path::Path;

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn run(
    config: &ProjectConfig,
    reference: &Path,
    generated: &Path,
    metric: Option<&str>,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format = parse_format(format)?;
    let metric: Metric = metric.unwrap_or(config.scoring.metric.as_str()).parse()?;

    let corpus = ReferenceCorpus::load(reference, config.corpus.max_lines)?;
    let generated_text = read_lossy(generated)?;
    let report = ScoreReport::new(
        &reference.display().to_string(),
        &generated.display().to_string(),
        &corpus.text(),
        &generated_text,
        metric,
    );
    emit(Report::Score(&report), format, output)
}

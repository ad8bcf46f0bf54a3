//! Extract command - pull a reference corpus out of an IVTFF transcription

use anyhow::Result;
use console::style;
use scriptorium::config::ProjectConfig;
use scriptorium::corpus;
use std::path::Path;

pub fn run(
    config: &ProjectConfig,
    input: &Path,
    output: &Path,
    max_lines: Option<usize>,
) -> Result<()> {
    let max_lines = max_lines.unwrap_or(config.corpus.max_lines);
    if max_lines == 0 {
        anyhow::bail!("--max-lines must be at least 1");
    }
    let lines = corpus::extract_file(input, max_lines)?;
    corpus::write_reference(output, &lines)?;
    println!(
        "{} Extracted {} lines to {}",
        style("✓").green(),
        style(lines.len()).cyan(),
        style(output.display()).cyan()
    );
    Ok(())
}

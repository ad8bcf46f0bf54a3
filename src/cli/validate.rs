//! Validate command - check card files against schema and content policy

use super::{emit, parse_format};
use anyhow::Result;
use scriptorium::config::ProjectConfig;
use scriptorium::reporters::Report;
use scriptorium::validate::Validator;
use std::path::{Path, PathBuf};

pub fn run(
    config: &ProjectConfig,
    files: &[PathBuf],
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format = parse_format(format)?;
    let validator = Validator::new(config.policy.clone())?;
    let summary = validator.validate_files(files)?;

    emit(Report::Validation(&summary), format, output)?;

    if !summary.passed() {
        let failing = summary.files.iter().filter(|f| !f.passed()).count();
        eprintln!(
            "Validation failed: {} of {} file(s) rejected",
            failing,
            summary.files.len()
        );
        std::process::exit(1);
    }
    Ok(())
}

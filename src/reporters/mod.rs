//! Output reporters for scriptorium reports
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors (plain when not a TTY)
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::error::ScriptoriumError;
use crate::generate::{Comparison, GenerationRun};
use crate::similarity::ScoreReport;
use crate::validate::ValidationSummary;
use anyhow::Result;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ScriptoriumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ScriptoriumError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Anything a subcommand can print
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    Validation(&'a ValidationSummary),
    Generation(&'a GenerationRun),
    Comparison(&'a Comparison),
    Score(&'a ScoreReport),
}

impl Report<'_> {
    fn serialize_json(&self, pretty: bool) -> Result<String> {
        match self {
            Report::Validation(r) => json::render(*r, pretty),
            Report::Generation(r) => json::render(*r, pretty),
            Report::Comparison(r) => json::render(*r, pretty),
            Report::Score(r) => json::render(*r, pretty),
        }
    }
}

/// Render a report in the named format
pub fn report(report: Report<'_>, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render a report using an OutputFormat enum
pub fn report_with_format(report: Report<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => report.serialize_json(true),
        OutputFormat::Text => Ok(match report {
            Report::Validation(r) => text::render_validation(r),
            Report::Generation(r) => text::render_generation(r),
            Report::Comparison(r) => text::render_comparison(r),
            Report::Score(r) => text::render_score(r),
        }),
    }
}

//! JSON reporter
//!
//! Serializes reports as-is. Useful for piping to jq or diffing two runs.

use anyhow::Result;
use serde::Serialize;

/// Render any report as JSON, pretty or single-line
pub fn render<T: Serialize + ?Sized>(report: &T, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(serde_json::to_string(report)?)
    }
}

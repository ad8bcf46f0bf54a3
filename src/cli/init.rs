//! Init command - write a default scriptorium.toml

use anyhow::{Context, Result};
use console::style;
use scriptorium::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE};
use std::path::Path;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists; remove it first to regenerate",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\n{}",
        style("Edit the [policy] lists to match your card language.").dim()
    );
    Ok(())
}

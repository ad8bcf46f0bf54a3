//! Scriptorium - validate study cards and run the seeded generation demo
//!
//! Validates newline-delimited JSON cards against schema and content policy,
//! extracts a reference corpus from IVTFF transcriptions, and generates and
//! scores pseudo-text seeded by card content.

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level; logs go to stderr so stdout stays a report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}

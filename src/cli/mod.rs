//! CLI command definitions and handlers

mod extract;
mod generate;
mod init;
mod score;
mod validate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use scriptorium::config::{load_config_file, load_project_config, ProjectConfig};
use scriptorium::reporters::{self, OutputFormat, Report};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Scriptorium - validate study cards and run the seeded generation demo
#[derive(Parser, Debug)]
#[command(name = "scriptorium")]
#[command(
    version,
    about = "Validate medieval-source study cards and score card-seeded pseudo-text",
    long_about = "Scriptorium checks newline-delimited JSON study cards against the card \
schema and a content policy, and runs a toy demonstration that generates pseudo-text \
from a reference transcription and measures how card content shifts its likeness score.\n\n\
Scores are distributional similarity only; they make no decoding claim.",
    after_help = "\
Examples:
  scriptorium validate cards/*.jsonl                  Validate card files
  scriptorium extract -i voynich.ivtff -o ref.txt     Extract a reference corpus
  scriptorium generate -r ref.txt -c cards.jsonl      Generate and score
  scriptorium compare -r ref.txt -c cards.jsonl       Normal vs neutral seeding
  scriptorium score -r ref.txt -g generated.txt       Score two text files"
)]
pub struct Cli {
    /// Config file (default: ./scriptorium.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Generation flags shared by `generate` and `compare`
#[derive(clap::Args, Debug, Clone)]
pub struct GenerationArgs {
    /// Extracted reference corpus (one line per transcription line)
    #[arg(long, short = 'r')]
    pub reference: PathBuf,

    /// Card files whose content seeds generation (repeatable)
    #[arg(long, short = 'c')]
    pub cards: Vec<PathBuf>,

    /// Stream bias: A or B
    #[arg(long, short = 's')]
    pub stream: Option<String>,

    /// Base RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Lines generated per card
    #[arg(long)]
    pub lines_per_card: Option<usize>,

    /// Words per generated line
    #[arg(long)]
    pub words_per_line: Option<usize>,

    /// Headline metric: js_bigram, js_unigram, cosine_trigram
    #[arg(long, short = 'm')]
    pub metric: Option<String>,

    /// Output format: text, json
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Write the report to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl GenerationArgs {
    /// Fold command-line overrides into the loaded configuration.
    pub(crate) fn apply_to(&self, config: &mut ProjectConfig) {
        if let Some(stream) = &self.stream {
            config.generator.stream = stream.clone();
        }
        if let Some(seed) = self.seed {
            config.generator.seed = seed;
        }
        if let Some(n) = self.lines_per_card {
            config.generator.lines_per_card = n;
        }
        if let Some(n) = self.words_per_line {
            config.generator.words_per_line = n;
        }
        if let Some(metric) = &self.metric {
            config.scoring.metric = metric.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a commented scriptorium.toml with the default settings
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate card files (exit code 1 if any file fails)
    #[command(after_help = "\
Examples:
  scriptorium validate cards.jsonl                   Validate one file
  scriptorium validate a.jsonl b.jsonl -f json       JSON report for several files
  scriptorium validate cards.jsonl -o report.json -f json")]
    Validate {
        /// Card files (newline-delimited JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Extract a reference corpus from an IVTFF transcription
    Extract {
        /// IVTFF transcription file
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Reference corpus file to write
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Maximum number of lines to keep
        #[arg(long)]
        max_lines: Option<usize>,
    },

    /// Generate pseudo-text seeded by cards and score it against the reference
    Generate {
        #[command(flatten)]
        args: GenerationArgs,

        /// Seed mode: normal (card content seeds) or neutral (evidence and source blanked)
        #[arg(long)]
        seed_mode: Option<String>,
    },

    /// Run normal and neutral seeding side by side and report the score delta
    Compare {
        #[command(flatten)]
        args: GenerationArgs,
    },

    /// Score a generated text file against a reference file
    Score {
        /// Reference text
        #[arg(long, short = 'r')]
        reference: PathBuf,

        /// Generated text
        #[arg(long, short = 'g')]
        generated: PathBuf,

        /// Headline metric: js_bigram, js_unigram, cosine_trigram
        #[arg(long, short = 'm')]
        metric: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Explicit `--config` must load; the working-directory file is best effort.
fn load_config(explicit: Option<&Path>) -> Result<ProjectConfig> {
    match explicit {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(load_project_config(Path::new("."))),
    }
}

/// Parse `--format`. Handlers call this before doing any work.
pub(crate) fn parse_format(format: &str) -> Result<OutputFormat> {
    Ok(OutputFormat::from_str(format)?)
}

/// Render a report and print it or write it to `output`.
pub(crate) fn emit(report: Report<'_>, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let rendered = reporters::report_with_format(report, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("Report written to: {}", style(path.display()).cyan());
        }
        None => {
            if format == OutputFormat::Json {
                println!("{}", rendered);
            } else {
                print!("{}", rendered);
            }
        }
    }
    Ok(())
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    let config = || load_config(cli.config.as_deref());
    match cli.command {
        Commands::Init { path } => init::run(&path),
        Commands::Validate {
            files,
            format,
            output,
        } => validate::run(&config()?, &files, &format, output.as_deref()),
        Commands::Extract {
            input,
            output,
            max_lines,
        } => extract::run(&config()?, &input, &output, max_lines),
        Commands::Generate { args, seed_mode } => {
            generate::run(config()?, &args, seed_mode.as_deref())
        }
        Commands::Compare { args } => generate::compare(config()?, &args),
        Commands::Score {
            reference,
            generated,
            metric,
            format,
            output,
        } => score::run(
            &config()?,
            &reference,
            &generated,
            metric.as_deref(),
            &format,
            output.as_deref(),
        ),
    }
}

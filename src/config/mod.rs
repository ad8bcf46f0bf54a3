//! Configuration module for Scriptorium
//!
//! This module handles:
//! - Project-level configuration (scriptorium.toml)
//! - Content-policy vocabulary for the validator
//! - Generator, corpus and scoring defaults

mod project_config;

pub use project_config::{
    load_config_file, load_project_config, CorpusConfig, GeneratorConfig, PolicyConfig,
    ProjectConfig, ScoringConfig, CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE,
};

//! Scriptorium - card validation and seeded pseudo-text generation
//!
//! Two pipelines share one card model:
//! - [`validate`] checks newline-delimited JSON card files against the card
//!   schema and a pluggable content-policy rule set
//! - [`generate`] builds a character transition model from a reference
//!   corpus ([`corpus`]), folds in card seed text, samples pseudo-text under
//!   a stream bias and scores it with [`similarity`]

pub mod config;
pub mod corpus;
pub mod error;
pub mod generate;
pub mod models;
pub mod reporters;
pub mod similarity;
pub mod validate;

pub use error::{Result, ScriptoriumError};

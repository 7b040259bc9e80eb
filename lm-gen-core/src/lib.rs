//! N-gram language model estimation and sentence completion.
//!
//! This crate provides a word-level n-gram pipeline including:
//! - Single-pass counting of n-grams and histories over a tokenized corpus
//! - Maximum likelihood estimation of P(w|h), without smoothing
//! - Reproducible weighted sampling of completions from a seeded random source
//! - Vocabulary and counts reports, and a binary model cache
//!
//! The trained model is immutable: generation only borrows it.

/// Core n-gram model, estimation and generation logic.
pub mod model;

/// Model construction parameters.
pub mod config;

/// Error type shared by the whole pipeline.
pub mod error;

/// Corpus reading and path helpers.
pub mod io;

/// Vocabulary and counts reports.
pub mod report;

pub use config::{ModelConfig, TrailingSentence};
pub use error::{LmError, Result};
pub use model::generator::Generator;
pub use model::language_model::LanguageModel;
pub use model::tokens::{END_TOKEN, FAIL_TOKEN, START_TOKEN, join_tokens, split_tokens};

//! Top-level module for the n-gram language model.
//!
//! This module provides the full estimation and sampling pipeline:
//! - Reserved tokens and tuple keys (`tokens`)
//! - The sorted vocabulary (`Vocabulary`)
//! - Single-pass n-gram and history counting (`CountCollector`)
//! - Maximum likelihood estimation (`ProbabilityTable`)
//! - Inverse-CDF sampling (`DiscreteSampler`)
//! - The immutable trained model (`LanguageModel`)
//! - A seeded high-level generation interface (`Generator`)

/// High-level interface pairing a model with its random source.
pub mod generator;

/// The trained model: construction, caching and word sampling.
pub mod language_model;

/// Count collection over a sentence-delimited token stream.
///
/// Produces history counts (1..max_order-1 tokens) and n-gram
/// counts (2..max_order tokens) in one pass.
pub mod counts;

/// Conversion of counts into conditional probabilities.
pub mod probability;

/// Discrete distribution sampling and history truncation.
pub mod sampler;

/// Reserved tokens, tuple keys and token sequence helpers.
pub mod tokens;

/// Distinct corpus tokens in draw order.
pub mod vocabulary;

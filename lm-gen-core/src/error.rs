//! Error type shared by every stage of the model pipeline.
//!
//! Unseen histories during generation are not errors: sampling returns the
//! failure sentinel instead. Everything listed here is fatal to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for language model operations.
pub type Result<T> = std::result::Result<T, LmError>;

/// Errors raised while building, caching, or reporting a language model.
#[derive(Error, Debug)]
pub enum LmError {
	/// A corpus, report, or cache file could not be opened, read, or written.
	#[error("Unable to open file {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The maximum n-gram order is below 2.
	#[error("Invalid maximum order {0}: an n-gram model needs an order >= 2")]
	InvalidOrder(usize),

	/// An n-gram was counted without its history being counted.
	///
	/// This is a defect in the count collector, never a user error.
	#[error("Internal consistency error: n-gram '{ngram}' was counted but its history was not")]
	MissingHistory { ngram: String },

	/// The binary model cache could not be encoded or decoded.
	#[error("Model cache error: {0}")]
	Cache(#[from] postcard::Error),
}

impl LmError {
	/// Wraps an I/O error with the path that caused it.
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}
}

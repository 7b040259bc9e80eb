use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LmError, Result};

/// Default maximum n-gram order.
pub const DEFAULT_MAX_ORDER: usize = 3;

/// What to do with tokens left after the last end-marker of the corpus.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrailingSentence {
	/// Count the unterminated tail as if it were a sentence.
	#[default]
	Flush,
	/// Drop the unterminated tail. Its tokens still reach the vocabulary.
	Discard,
}

/// Model construction parameters.
///
/// The random source is not part of the configuration: callers seed it
/// themselves and hand it to the sampler.
///
/// # Invariants
/// - `max_order >= 2` once validated
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
	/// Maximum n-gram order to estimate.
	pub max_order: usize,

	/// Handling of a trailing sentence without end-marker.
	pub trailing_sentence: TrailingSentence,

	/// Optional path of the vocabulary report.
	pub vocab_report: Option<PathBuf>,

	/// Optional path of the counts report.
	pub counts_report: Option<PathBuf>,

	/// Whether to load/store a binary model next to the corpus.
	pub cache: bool,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			max_order: DEFAULT_MAX_ORDER,
			trailing_sentence: TrailingSentence::default(),
			vocab_report: None,
			counts_report: None,
			cache: false,
		}
	}
}

impl ModelConfig {
	/// Creates a configuration for the given maximum order.
	///
	/// # Errors
	/// Returns [`LmError::InvalidOrder`] if `max_order < 2`.
	pub fn new(max_order: usize) -> Result<Self> {
		let config = Self { max_order, ..Self::default() };
		config.validate()?;
		Ok(config)
	}

	/// Checks the invariants of a configuration built by hand or deserialized.
	pub fn validate(&self) -> Result<()> {
		if self.max_order < 2 {
			return Err(LmError::InvalidOrder(self.max_order));
		}
		Ok(())
	}

	pub fn with_trailing_sentence(mut self, trailing_sentence: TrailingSentence) -> Self {
		self.trailing_sentence = trailing_sentence;
		self
	}

	pub fn with_vocab_report<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.vocab_report = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_counts_report<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.counts_report = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_cache(mut self, cache: bool) -> Self {
		self.cache = cache;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_orders_below_two() {
		assert!(matches!(ModelConfig::new(1), Err(LmError::InvalidOrder(1))));
		assert!(matches!(ModelConfig::new(0), Err(LmError::InvalidOrder(0))));
		assert!(ModelConfig::new(2).is_ok());
	}

	#[test]
	fn defaults_flush_trailing_sentence() {
		let config = ModelConfig::default();
		assert_eq!(config.max_order, DEFAULT_MAX_ORDER);
		assert_eq!(config.trailing_sentence, TrailingSentence::Flush);
		assert!(!config.cache);
	}

	#[test]
	fn builder_sets_report_paths() {
		let config = ModelConfig::new(2)
			.unwrap()
			.with_vocab_report("vocab.txt")
			.with_counts_report("counts.txt")
			.with_trailing_sentence(TrailingSentence::Discard);
		assert_eq!(config.vocab_report.as_deref(), Some(Path::new("vocab.txt")));
		assert_eq!(config.counts_report.as_deref(), Some(Path::new("counts.txt")));
		assert_eq!(config.trailing_sentence, TrailingSentence::Discard);
	}
}

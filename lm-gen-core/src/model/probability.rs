use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::counts::CountTable;
use super::tokens::NGram;
use crate::error::{LmError, Result};

/// Maximum likelihood estimates P(w|h) for every counted n-gram (h, w).
///
/// # Invariants
/// - Every stored probability is in (0, 1]
/// - Unseen n-grams are absent, never stored as zero
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ProbabilityTable {
	probabilities: HashMap<NGram, f64>,
}

impl ProbabilityTable {
	/// Converts counts into conditional probabilities.
	///
	/// P(w|h) = count(h, w) / count(h), no smoothing.
	///
	/// # Errors
	/// Returns [`LmError::MissingHistory`] when an n-gram was counted
	/// without its history, which means the counts are corrupt.
	pub fn estimate(counts: &CountTable) -> Result<Self> {
		let mut probabilities = HashMap::with_capacity(counts.ngram_len());

		for (ngram, ngram_count) in counts.ngrams() {
			let history_count = match ngram.history() {
				Some(history) => counts.history_count(history.tokens()),
				None => 0,
			};
			if history_count == 0 {
				return Err(LmError::MissingHistory { ngram: ngram.to_string() });
			}

			let probability = ngram_count as f64 / history_count as f64;
			if probability > 0.0 {
				probabilities.insert(ngram.clone(), probability);
			}
		}

		Ok(Self { probabilities })
	}

	/// Returns P(w|h) for the n-gram `tokens` (history followed by word), 0 if unseen.
	pub fn get(&self, tokens: &[String]) -> f64 {
		self.probabilities.get(tokens).copied().unwrap_or(0.0)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&NGram, f64)> {
		self.probabilities.iter().map(|(k, v)| (k, *v))
	}

	pub fn len(&self) -> usize {
		self.probabilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.probabilities.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::TrailingSentence;
	use crate::model::counts::collect_counts;
	use crate::model::tokens::split_tokens;

	fn table(text: &str, max_order: usize) -> ProbabilityTable {
		let (counts, _) = collect_counts(text.split_whitespace(), max_order, TrailingSentence::Flush).unwrap();
		ProbabilityTable::estimate(&counts).unwrap()
	}

	#[test]
	fn single_sentence_is_deterministic() {
		let table = table("<s> a b </s>", 2);
		assert_eq!(table.len(), 3);
		for ngram in ["<s> a", "a b", "b </s>"] {
			assert_eq!(table.get(&split_tokens(ngram)), 1.0);
		}
	}

	#[test]
	fn branching_history_splits_mass() {
		let table = table("<s> a b </s> <s> a c </s> <s> a c </s>", 2);
		let b = table.get(&split_tokens("a b"));
		let c = table.get(&split_tokens("a c"));
		assert!((b - 1.0 / 3.0).abs() < 1e-12);
		assert!((c - 2.0 / 3.0).abs() < 1e-12);
	}

	#[test]
	fn unseen_ngram_is_zero() {
		let table = table("<s> a </s>", 2);
		assert_eq!(table.get(&split_tokens("a a")), 0.0);
	}

	#[test]
	fn ngram_without_history_is_an_internal_error() {
		let ngrams = HashMap::from([(NGram::from("a b"), 1)]);
		let counts = CountTable::from_raw(ngrams, HashMap::new());

		match ProbabilityTable::estimate(&counts) {
			Err(LmError::MissingHistory { ngram }) => assert_eq!(ngram, "a b"),
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn empty_counts_give_empty_table() {
		let table = ProbabilityTable::estimate(&CountTable::default()).unwrap();
		assert!(table.is_empty());
	}
}

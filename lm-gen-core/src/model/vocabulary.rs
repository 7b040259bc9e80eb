use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::tokens::caseless_cmp;

/// The distinct tokens of a corpus, sorted case-insensitively ascending.
///
/// The order is the enumeration order of the sampler's cumulative draw,
/// so it must stay stable for a given corpus.
///
/// # Invariants
/// - No duplicate tokens
/// - Sorted with [`caseless_cmp`]
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Vocabulary {
	words: Vec<String>,
}

impl Vocabulary {
	/// Collects the distinct tokens of `tokens` and sorts them.
	///
	/// An empty stream yields an empty vocabulary.
	pub fn from_tokens<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut seen = HashSet::new();
		let mut words = Vec::new();
		for token in tokens {
			let token = token.as_ref();
			if seen.insert(token.to_owned()) {
				words.push(token.to_owned());
			}
		}
		words.sort_by(|a, b| caseless_cmp(a, b));
		Self { words }
	}

	pub fn words(&self) -> &[String] {
		&self.words
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.words.iter().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words
			.binary_search_by(|probe| caseless_cmp(probe, word))
			.is_ok()
	}
}

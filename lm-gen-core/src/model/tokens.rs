use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved token marking the start of a sentence.
pub const START_TOKEN: &str = "<s>";

/// Reserved token marking the end of a sentence.
///
/// Also a normal stop condition for generation.
pub const END_TOKEN: &str = "</s>";

/// Reserved token returned when no word could be sampled for a history.
pub const FAIL_TOKEN: &str = "<fail>";

/// An ordered tuple of tokens.
///
/// Used both for histories (1..max_order-1 tokens) and for n-grams
/// (a history plus one following token, 2..max_order tokens).
/// Keys are compared token by token, so `"a b" + "c"` and `"a" + "b c"`
/// can never collide the way space-joined strings would.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NGram(Vec<String>);

impl NGram {
	pub fn new(tokens: Vec<String>) -> Self {
		Self(tokens)
	}

	pub fn tokens(&self) -> &[String] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the history part of this n-gram (every token but the last).
	///
	/// Returns `None` for n-grams shorter than 2 tokens.
	pub fn history(&self) -> Option<NGram> {
		match self.0.len() {
			0 | 1 => None,
			n => Some(Self(self.0[..n - 1].to_vec())),
		}
	}
}

impl Borrow<[String]> for NGram {
	fn borrow(&self) -> &[String] {
		&self.0
	}
}

impl From<&[String]> for NGram {
	fn from(tokens: &[String]) -> Self {
		Self(tokens.to_vec())
	}
}

impl From<&str> for NGram {
	fn from(text: &str) -> Self {
		Self(split_tokens(text))
	}
}

impl fmt::Display for NGram {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&join_tokens(&self.0))
	}
}

/// Joins tokens with single spaces.
///
/// The empty sequence maps to the empty string.
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
	let mut out = String::new();
	for (i, token) in tokens.iter().enumerate() {
		if i > 0 {
			out.push(' ');
		}
		out.push_str(token.as_ref());
	}
	out
}

/// Splits a string on single spaces.
///
/// Inverse of [`join_tokens`] for tokens without embedded spaces;
/// the empty string maps to the empty sequence.
pub fn split_tokens(text: &str) -> Vec<String> {
	if text.is_empty() {
		return Vec::new();
	}
	text.split(' ').map(str::to_owned).collect()
}

/// Case-insensitive ordering, ties broken by the natural (case-sensitive) order.
///
/// Used for the vocabulary draw order and for both reports, so the
/// enumeration stays total and deterministic.
pub fn caseless_cmp(a: &str, b: &str) -> Ordering {
	a.to_lowercase()
		.cmp(&b.to_lowercase())
		.then_with(|| a.cmp(b))
}

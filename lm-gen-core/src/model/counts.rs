use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::tokens::{END_TOKEN, NGram, caseless_cmp};
use super::vocabulary::Vocabulary;
use crate::config::TrailingSentence;
use crate::error::{LmError, Result};

/// Occurrence counts of n-grams and of their histories.
///
/// # Invariants
/// - Every stored count is strictly positive
/// - If an n-gram is counted, its history is counted at least as often
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CountTable {
	/// n-grams of length 2..=max_order
	ngrams: HashMap<NGram, usize>,
	/// histories of length 1..max_order
	histories: HashMap<NGram, usize>,
}

impl CountTable {
	/// Returns how many times `ngram` was seen, 0 if never.
	pub fn ngram_count(&self, ngram: &[String]) -> usize {
		self.ngrams.get(ngram).copied().unwrap_or(0)
	}

	/// Returns how many times `history` was seen, 0 if never.
	pub fn history_count(&self, history: &[String]) -> usize {
		self.histories.get(history).copied().unwrap_or(0)
	}

	pub fn ngrams(&self) -> impl Iterator<Item = (&NGram, usize)> {
		self.ngrams.iter().map(|(k, v)| (k, *v))
	}

	pub fn histories(&self) -> impl Iterator<Item = (&NGram, usize)> {
		self.histories.iter().map(|(k, v)| (k, *v))
	}

	pub fn ngram_len(&self) -> usize {
		self.ngrams.len()
	}

	pub fn history_len(&self) -> usize {
		self.histories.len()
	}

	/// Returns the n-grams sorted case-insensitively by their space-joined text.
	pub fn sorted_ngrams(&self) -> Vec<(String, usize)> {
		let mut rows: Vec<(String, usize)> = self
			.ngrams
			.iter()
			.map(|(ngram, count)| (ngram.to_string(), *count))
			.collect();
		rows.sort_by(|a, b| caseless_cmp(&a.0, &b.0));
		rows
	}

	#[cfg(test)]
	pub(crate) fn from_raw(ngrams: HashMap<NGram, usize>, histories: HashMap<NGram, usize>) -> Self {
		Self { ngrams, histories }
	}

	fn add_ngram(&mut self, ngram: &[String]) {
		increment(&mut self.ngrams, ngram);
	}

	fn add_history(&mut self, history: &[String]) {
		increment(&mut self.histories, history);
	}
}

fn increment(map: &mut HashMap<NGram, usize>, key: &[String]) {
	match map.get_mut(key) {
		Some(count) => *count += 1,
		None => {
			map.insert(NGram::from(key), 1);
		}
	}
}

/// Single-pass collector of n-gram and history counts.
///
/// Tokens are buffered until the end-marker closes the sentence, then the
/// buffer is flushed:
/// 1. While the buffer holds at least `max_order` tokens, every prefix pair
///    (first `i` tokens as history, first `i + 1` as n-gram) for
///    `i in 1..max_order` is counted and the front token is dropped.
/// 2. The shorter remainder is flushed the same way with prefixes bounded by
///    its own length, so short sentences still feed the lower orders.
/// 3. When the sentence ends with the end-marker, that token is counted once
///    more as a history. An unterminated trailing sentence skips this step.
///
/// Windows never cross a sentence boundary.
#[derive(Debug)]
pub struct CountCollector {
	max_order: usize,
	trailing: TrailingSentence,
	sentence: Vec<String>,
	seen: HashSet<String>,
	counts: CountTable,
	sentences: usize,
}

impl CountCollector {
	/// Creates an empty collector.
	///
	/// # Errors
	/// Returns [`LmError::InvalidOrder`] if `max_order < 2`.
	pub fn new(max_order: usize, trailing: TrailingSentence) -> Result<Self> {
		if max_order < 2 {
			return Err(LmError::InvalidOrder(max_order));
		}
		Ok(Self {
			max_order,
			trailing,
			sentence: Vec::new(),
			seen: HashSet::new(),
			counts: CountTable::default(),
			sentences: 0,
		})
	}

	/// Feeds one token of the corpus.
	pub fn push(&mut self, token: &str) {
		if !self.seen.contains(token) {
			self.seen.insert(token.to_owned());
		}
		self.sentence.push(token.to_owned());
		if token == END_TOKEN {
			self.flush_sentence();
		}
	}

	/// Ends the stream and returns the counts and the vocabulary.
	pub fn finish(mut self) -> (CountTable, Vocabulary) {
		if !self.sentence.is_empty() {
			match self.trailing {
				TrailingSentence::Flush => {
					warn!("Corpus ends without {END_TOKEN}, counting the last {} tokens as a sentence", self.sentence.len());
					self.flush_sentence();
				}
				TrailingSentence::Discard => {
					warn!("Corpus ends without {END_TOKEN}, discarding the last {} tokens", self.sentence.len());
					self.sentence.clear();
				}
			}
		}

		debug!(
			"Counted {} sentences: {} n-grams, {} histories, {} words",
			self.sentences,
			self.counts.ngram_len(),
			self.counts.history_len(),
			self.seen.len()
		);

		let vocabulary = Vocabulary::from_tokens(self.seen);
		(self.counts, vocabulary)
	}

	fn flush_sentence(&mut self) {
		let sentence = std::mem::take(&mut self.sentence);
		let mut front = 0;

		// Full windows
		while sentence.len() - front >= self.max_order {
			self.count_prefixes(&sentence[front..front + self.max_order]);
			front += 1;
		}

		// Shorter tail windows
		while front < sentence.len() {
			self.count_prefixes(&sentence[front..]);
			front += 1;
		}

		// Only the end-marker closes a sentence with a lone history
		if let Some(last) = sentence.last().filter(|last| *last == END_TOKEN) {
			self.counts.add_history(std::slice::from_ref(last));
		}
		self.sentences += 1;
	}

	/// Counts `window[..i]` as history and `window[..=i]` as n-gram for every `i`.
	fn count_prefixes(&mut self, window: &[String]) {
		for i in 1..window.len() {
			self.counts.add_history(&window[..i]);
			self.counts.add_ngram(&window[..=i]);
		}
	}
}

/// Counts a whole token stream in one pass.
pub fn collect_counts<I, S>(tokens: I, max_order: usize, trailing: TrailingSentence) -> Result<(CountTable, Vocabulary)>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut collector = CountCollector::new(max_order, trailing)?;
	for token in tokens {
		collector.push(token.as_ref());
	}
	Ok(collector.finish())
}

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::counts::{CountTable, collect_counts};
use super::probability::ProbabilityTable;
use super::sampler::{DiscreteSampler, UniformSource, effective_order};
use super::tokens::{END_TOKEN, FAIL_TOKEN};
use super::vocabulary::Vocabulary;
use crate::config::{ModelConfig, TrailingSentence};
use crate::error::{LmError, Result};
use crate::io::{build_output_path, read_tokens};
use crate::report;

/// A trained maximum likelihood n-gram model.
///
/// Built once from a full corpus pass and immutable afterwards: sampling
/// only takes `&self`, the caller owns the random source.
///
/// # Invariants
/// - `max_order >= 2`
/// - Every n-gram in `probabilities` is made of vocabulary words
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LanguageModel {
	max_order: usize,
	vocabulary: Vocabulary,
	probabilities: ProbabilityTable,
}

/// Binary cache content: the model plus what is needed to rewrite the reports.
#[derive(Serialize, Deserialize)]
struct ModelCache {
	trailing: TrailingSentence,
	model: LanguageModel,
	counts: CountTable,
}

impl LanguageModel {
	/// Estimates a model from already computed counts.
	///
	/// # Errors
	/// - [`LmError::InvalidOrder`] if `max_order < 2`
	/// - [`LmError::MissingHistory`] if the counts are inconsistent
	pub fn from_counts(counts: &CountTable, vocabulary: Vocabulary, max_order: usize) -> Result<Self> {
		if max_order < 2 {
			return Err(LmError::InvalidOrder(max_order));
		}
		let probabilities = ProbabilityTable::estimate(counts)?;
		Ok(Self { max_order, vocabulary, probabilities })
	}

	/// Counts and estimates a model from a token stream.
	///
	/// Returns the counts alongside the model so callers can report them.
	pub fn from_tokens<I, S>(tokens: I, config: &ModelConfig) -> Result<(Self, CountTable)>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		config.validate()?;
		let (counts, vocabulary) = collect_counts(tokens, config.max_order, config.trailing_sentence)?;
		let model = Self::from_counts(&counts, vocabulary, config.max_order)?;
		Ok((model, counts))
	}

	/// Trains a model from a corpus file and writes the configured reports.
	///
	/// - If `config.cache` is set and `<corpus-stem>.bin` exists with the same
	///   order and trailing policy, the model is loaded from it
	/// - Otherwise the corpus is read, counted and estimated, and the cache
	///   is written when enabled
	/// - Vocabulary and counts reports are written when their paths are set
	pub fn train<P: AsRef<Path>>(corpus: P, config: &ModelConfig) -> Result<Self> {
		config.validate()?;
		let corpus = corpus.as_ref();

		let cache_path = if config.cache { Some(build_output_path(corpus, "bin")?) } else { None };
		let cached = match &cache_path {
			Some(path) if path.exists() => Self::load_cache(path, config)?,
			_ => None,
		};

		let (model, counts) = match cached {
			Some(cache) => {
				info!("Loaded {}-gram model from cache", cache.model.max_order);
				(cache.model, cache.counts)
			}
			None => {
				info!("Training {}-gram model from {}", config.max_order, corpus.display());
				let tokens = read_tokens(corpus)?;
				let (model, counts) = Self::from_tokens(tokens, config)?;
				if let Some(path) = &cache_path {
					Self::store_cache(path, config.trailing_sentence, model, counts)?
				} else {
					(model, counts)
				}
			}
		};

		if let Some(path) = &config.counts_report {
			report::write_counts(path, &counts)?;
		}
		if let Some(path) = &config.vocab_report {
			report::write_vocabulary(path, &model.vocabulary)?;
		}

		info!(
			"Model ready: {} words, {} n-grams up to order {}",
			model.vocabulary.len(),
			model.probabilities.len(),
			model.max_order
		);
		Ok(model)
	}

	/// Returns the cache content if it matches `config`, `None` if it is stale.
	fn load_cache(path: &Path, config: &ModelConfig) -> Result<Option<ModelCache>> {
		let bytes = std::fs::read(path).map_err(|e| LmError::io(path, e))?;
		let cache: ModelCache = postcard::from_bytes(&bytes)?;
		if cache.model.max_order != config.max_order || cache.trailing != config.trailing_sentence {
			debug!("Ignoring stale cache {}", path.display());
			return Ok(None);
		}
		Ok(Some(cache))
	}

	fn store_cache(
		path: &Path,
		trailing: TrailingSentence,
		model: LanguageModel,
		counts: CountTable,
	) -> Result<(LanguageModel, CountTable)> {
		let cache = ModelCache { trailing, model, counts };
		let bytes = postcard::to_stdvec(&cache)?;
		std::fs::write(path, bytes).map_err(|e| LmError::io(path, e))?;
		debug!("Wrote model cache {}", path.display());
		Ok((cache.model, cache.counts))
	}

	pub fn max_order(&self) -> usize {
		self.max_order
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	pub fn probabilities(&self) -> &ProbabilityTable {
		&self.probabilities
	}

	/// Returns P(w|h) for the n-gram `tokens`, 0 if unseen.
	pub fn probability(&self, tokens: &[String]) -> f64 {
		self.probabilities.get(tokens)
	}

	/// Draws the next word following `history` with an n-gram of `order`.
	///
	/// Only the last `min(order - 1, history.len())` tokens of `history` are
	/// used. Candidates are enumerated in vocabulary order and the first one
	/// whose cumulative probability exceeds a uniform draw is returned.
	/// Returns [`FAIL_TOKEN`] when the history was never observed.
	///
	/// Exactly one value is drawn from `rng` per call.
	pub fn random_next_word<R>(&self, history: &[String], order: usize, rng: &mut R) -> &str
	where
		R: UniformSource + ?Sized,
	{
		let keep = effective_order(order, history.len());
		let mut key = history[history.len() - keep..].to_vec();

		let lookup = |word: &&str| {
			key.push((*word).to_owned());
			let probability = self.probabilities.get(&key);
			key.pop();
			probability
		};

		DiscreteSampler::new(self.vocabulary.iter(), lookup)
			.sample(rng)
			.unwrap_or(FAIL_TOKEN)
	}

	/// Generates words after `history` until [`END_TOKEN`] or [`FAIL_TOKEN`].
	///
	/// Each drawn word is appended to the output preceded by a space, the
	/// terminal token included. `history` itself is left untouched, and at
	/// least one word is always drawn.
	pub fn random_completion<R>(&self, history: &[String], order: usize, rng: &mut R) -> String
	where
		R: UniformSource + ?Sized,
	{
		let mut working = history.to_vec();
		let mut completion = String::new();

		loop {
			let word = self.random_next_word(&working, order, rng);
			completion.push(' ');
			completion.push_str(word);

			let done = word == END_TOKEN || word == FAIL_TOKEN;
			working.push(word.to_owned());
			if done {
				break;
			}
		}

		completion
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::sampler::tests::FixedDraw;
	use crate::model::tokens::split_tokens;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	const CORPUS: &str = "<s> the cat sat </s> <s> the dog sat </s> <s> the cat ran away </s>";

	fn model(text: &str, max_order: usize) -> LanguageModel {
		let config = ModelConfig::new(max_order).unwrap();
		LanguageModel::from_tokens(text.split_whitespace(), &config).unwrap().0
	}

	#[test]
	fn deterministic_chain_completes() {
		let model = model("<s> a b </s>", 2);
		let completion = model.random_completion(&split_tokens("<s>"), 2, &mut FixedDraw(0.5));
		assert_eq!(completion, " a b </s>");
	}

	#[test]
	fn draw_selects_by_vocabulary_order() {
		// P(cat|the) = 2/3, P(dog|the) = 1/3; "cat" comes first
		let model = model(CORPUS, 2);
		let history = split_tokens("<s> the");
		assert_eq!(model.random_next_word(&history, 2, &mut FixedDraw(0.0)), "cat");
		assert_eq!(model.random_next_word(&history, 2, &mut FixedDraw(0.66)), "cat");
		assert_eq!(model.random_next_word(&history, 2, &mut FixedDraw(0.67)), "dog");
	}

	#[test]
	fn longer_order_uses_more_history() {
		let model = model(CORPUS, 3);
		let history = split_tokens("the cat");
		// P(sat|the cat) = P(ran|the cat) = 1/2, "ran" sorts first
		assert_eq!(model.random_next_word(&history, 3, &mut FixedDraw(0.1)), "ran");
		assert_eq!(model.random_next_word(&history, 3, &mut FixedDraw(0.6)), "sat");
		// Bigram order only looks at "cat"
		assert_eq!(model.random_next_word(&history, 2, &mut FixedDraw(0.6)), "sat");
	}

	#[test]
	fn unseen_history_fails_for_any_draw() {
		let model = model(CORPUS, 3);
		let history = split_tokens("purple");
		for draw in [0.0, 0.25, 0.5, 0.999] {
			assert_eq!(model.random_next_word(&history, 3, &mut FixedDraw(draw)), FAIL_TOKEN);
		}
	}

	#[test]
	fn empty_history_or_unigram_order_fails() {
		let model = model(CORPUS, 3);
		assert_eq!(model.random_next_word(&[], 3, &mut FixedDraw(0.0)), FAIL_TOKEN);
		assert_eq!(model.random_next_word(&split_tokens("the"), 1, &mut FixedDraw(0.0)), FAIL_TOKEN);
	}

	#[test]
	fn completion_stops_on_failure() {
		let model = model(CORPUS, 2);
		assert_eq!(model.random_completion(&split_tokens("zebra"), 2, &mut FixedDraw(0.3)), " <fail>");
	}

	#[test]
	fn completion_draws_even_after_end_marker() {
		let model = model(CORPUS, 2);
		// Only the tail history counts "</s>", no n-gram extends it
		let completion = model.random_completion(&split_tokens("<s> the cat sat </s>"), 2, &mut FixedDraw(0.0));
		assert_eq!(completion, " <fail>");
	}

	#[test]
	fn completion_leaves_history_untouched_and_is_reproducible() {
		let model = model(CORPUS, 3);
		let history = split_tokens("<s> the");
		let before = history.clone();

		let first = model.random_completion(&history, 3, &mut StdRng::seed_from_u64(42));
		let second = model.random_completion(&history, 3, &mut StdRng::seed_from_u64(42));

		assert_eq!(history, before);
		assert_eq!(first, second);
		assert!(first.ends_with(" </s>"));
	}

	#[test]
	fn rejects_invalid_order() {
		assert!(matches!(
			LanguageModel::from_counts(&CountTable::default(), Vocabulary::default(), 1),
			Err(LmError::InvalidOrder(1))
		));
	}
}

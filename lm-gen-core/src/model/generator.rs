use rand::SeedableRng;
use rand::rngs::StdRng;

use super::language_model::LanguageModel;
use super::sampler::UniformSource;
use super::tokens::split_tokens;

/// High-level generator pairing a read-only model with its random source.
///
/// ## Responsibilities:
/// - Keep one random source for a sequence of draws, so that the same seed
///   replays the same words
/// - Default the n-gram order to the model's maximum order
#[derive(Debug)]
pub struct Generator<'a, R> {
	model: &'a LanguageModel,
	rng: R,
}

impl<'a> Generator<'a, StdRng> {
	/// Creates a generator driven by a `StdRng` seeded with `seed`.
	pub fn seeded(model: &'a LanguageModel, seed: u64) -> Self {
		Self::new(model, StdRng::seed_from_u64(seed))
	}
}

impl<'a, R: UniformSource> Generator<'a, R> {
	pub fn new(model: &'a LanguageModel, rng: R) -> Self {
		Self { model, rng }
	}

	/// Draws one word after `history`. See [`LanguageModel::random_next_word`].
	pub fn next_word(&mut self, history: &[String], order: usize) -> &'a str {
		self.model.random_next_word(history, order, &mut self.rng)
	}

	/// Completes `history`. See [`LanguageModel::random_completion`].
	pub fn complete(&mut self, history: &[String], order: usize) -> String {
		self.model.random_completion(history, order, &mut self.rng)
	}

	/// Completes a space-separated history with the model's maximum order.
	pub fn complete_text(&mut self, history: &str) -> String {
		let order = self.model.max_order();
		self.complete(&split_tokens(history), order)
	}
}

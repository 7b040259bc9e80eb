use rand::{Rng, RngCore};

/// A source of uniform draws in `[0, 1)`.
///
/// Implemented for every `rand` generator. Tests can implement it
/// directly to pin the draw value.
pub trait UniformSource {
	fn next_unit(&mut self) -> f64;
}

impl<R: RngCore + ?Sized> UniformSource for R {
	fn next_unit(&mut self) -> f64 {
		self.random::<f64>()
	}
}

/// Number of history tokens used when conditioning on an n-gram `order`.
///
/// `min(order - 1, history_len)`. This is plain truncation, not back-off:
/// a history that was never observed still yields no candidates.
pub fn effective_order(order: usize, history_len: usize) -> usize {
	order.saturating_sub(1).min(history_len)
}

/// Inverse-CDF sampler over a discrete distribution.
///
/// The enumeration order fixes the cumulative layout of the distribution,
/// so a given draw always maps to the same outcome for the same order.
/// Probabilities come from a lookup function and are not required to
/// sum to 1: when the total mass does not exceed the draw, nothing is chosen.
pub struct DiscreteSampler<I, F> {
	order: I,
	lookup: F,
}

impl<T, I, F> DiscreteSampler<I, F>
where
	I: IntoIterator<Item = T>,
	F: FnMut(&T) -> f64,
{
	pub fn new(order: I, lookup: F) -> Self {
		Self { order, lookup }
	}

	/// Returns the first outcome whose cumulative probability strictly exceeds `draw`.
	pub fn pick(self, draw: f64) -> Option<T> {
		let mut lookup = self.lookup;
		let mut cumulative = 0.0;
		for outcome in self.order {
			cumulative += lookup(&outcome);
			if cumulative > draw {
				return Some(outcome);
			}
		}
		None
	}

	/// Draws from `rng` and picks the matching outcome.
	pub fn sample<R: UniformSource + ?Sized>(self, rng: &mut R) -> Option<T> {
		let draw = rng.next_unit();
		self.pick(draw)
	}
}

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use super::state::Transition;

/// Source of randomness for the writer.
///
/// A single operation: pick one index out of `n`. Injecting it keeps
/// generation reproducible in tests and lets callers plug their own source.
pub trait WordPicker {
	/// Returns an index in `0..n`. `n` is always strictly positive.
	fn pick(&mut self, n: usize) -> usize;
}

/// `WordPicker` backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomPicker<R> {
	rng: R,
}

impl<R: Rng> RandomPicker<R> {
	/// Wraps an existing generator.
	pub fn new(rng: R) -> Self {
		Self { rng }
	}
}

impl RandomPicker<StdRng> {
	/// Reproducible picker: the same seed always yields the same sequence.
	pub fn seeded(seed: u64) -> Self {
		Self::new(StdRng::seed_from_u64(seed))
	}

	/// Picker seeded from the operating system.
	pub fn from_os_rng() -> Self {
		Self::new(StdRng::from_os_rng())
	}
}

impl RandomPicker<ThreadRng> {
	/// Picker drawing from the thread-local generator.
	pub fn thread() -> Self {
		Self::new(rand::rng())
	}
}

impl<R: Rng> WordPicker for RandomPicker<R> {
	fn pick(&mut self, n: usize) -> usize {
		self.rng.random_range(0..n)
	}
}

/// Picks one transition with probability proportional to its occurrences.
///
/// This is the same draw as a uniform pick over a list where each word is
/// repeated once per occurrence.
///
/// `candidates` must not be empty.
pub(crate) fn pick_weighted<'t, P: WordPicker + ?Sized>(
	candidates: &[&'t Transition],
	picker: &mut P,
) -> &'t Transition {
	let total: usize = candidates.iter().map(|t| t.occurrences()).sum();
	let mut r = picker.pick(total);

	for &candidate in candidates {
		if r < candidate.occurrences() {
			return candidate;
		}
		r -= candidate.occurrences();
	}

	// Unreachable while pick honours its contract
	candidates[candidates.len() - 1]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::state::State;

	/// Replays a fixed list of picks.
	struct Replay(Vec<usize>);

	impl WordPicker for Replay {
		fn pick(&mut self, _n: usize) -> usize {
			self.0.remove(0)
		}
	}

	fn pond_state() -> State {
		let mut state = State::new();
		state.add_transition("pond", 1);
		state.add_transition("frog", 1);
		state.add_transition("frog", 1);
		state.add_transition("splash.", 1);
		state
	}

	#[test]
	fn weighted_pick_expands_occurrences() {
		let state = pond_state();
		let candidates: Vec<&Transition> = state.transitions().iter().collect();

		let mut picker = Replay(vec![0, 1, 2, 3]);
		let picked: Vec<&str> = (0..4).map(|_| pick_weighted(&candidates, &mut picker).word()).collect();
		assert_eq!(picked, vec!["pond", "frog", "frog", "splash."]);
	}

	#[test]
	fn seeded_pickers_agree() {
		let mut a = RandomPicker::seeded(7);
		let mut b = RandomPicker::seeded(7);
		let left: Vec<usize> = (0..32).map(|_| a.pick(1000)).collect();
		let right: Vec<usize> = (0..32).map(|_| b.pick(1000)).collect();
		assert_eq!(left, right);
	}

	#[test]
	fn picks_stay_in_range() {
		let mut picker = RandomPicker::thread();
		for n in 1..50 {
			assert!(picker.pick(n) < n);
		}
	}
}

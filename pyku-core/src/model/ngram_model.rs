use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::state::{State, Transition};
use crate::error::{Error, Result};

/// Represents a word n-gram model of a single order.
///
/// The `NGramModel` of order `n` maps every sequence of `n` consecutive
/// words seen in the corpus (the context key) to the words that followed it.
/// Order 0 has a single key, the empty sequence, and acts as a corpus-wide
/// unigram table.
///
/// # Responsibilities
/// - Slide a window of `n + 1` words over ingested text
/// - Accumulate transitions for each context key
/// - Answer exact-key lookups
/// - Merge with another model of the same order
///
/// # Invariants
/// - Every key holds exactly `n` words
/// - Zero-syllable words never become transitions, but their key is registered
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NGramModel {
	/// The order of the model (number of context words)
	n: usize,

	/// Mapping from a context key to its corresponding state
	states: HashMap<Vec<String>, State>,
}

impl NGramModel {
	/// Creates a new, empty model of order `n`.
	pub fn new(n: usize) -> Self {
		Self { n, states: HashMap::new() }
	}

	/// The order of the model.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Number of distinct context keys seen.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// Returns `true` if no key was ever seen.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Adds a tokenized text, each token paired with its syllable count.
	///
	/// Texts shorter than `n + 1` words contribute nothing.
	pub(crate) fn add_words(&mut self, words: &[(&str, usize)]) {
		for window in words.windows(self.n + 1) {
			let (context, next) = window.split_at(self.n);
			let key: Vec<String> = context.iter().map(|(word, _)| (*word).to_owned()).collect();
			let state = self.states.entry(key).or_default();

			let (word, syllables) = next[0];
			if syllables == 0 {
				continue;
			}
			state.add_transition(word, syllables);
		}
	}

	/// Returns the transitions following `key`, or an empty slice if the
	/// key was never seen.
	///
	/// Keys of the wrong length are simply never found.
	pub fn get(&self, key: &[String]) -> &[Transition] {
		self.states.get(key).map(State::transitions).unwrap_or(&[])
	}

	/// Returns the state of `key` if it was seen.
	pub fn state(&self, key: &[String]) -> Option<&State> {
		self.states.get(key)
	}

	/// Merges another model into this one.
	///
	/// # Notes
	/// - Both models must have the same order `n`.
	/// - Occurrence counts for matching keys and words are summed.
	///
	/// # Errors
	/// Returns an error if the model orders do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.n != other.n {
			return Err(Error::OrderMismatch { expected: self.n, found: other.n });
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state);
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}
}

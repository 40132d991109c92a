use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One observed continuation of a context key.
///
/// `occurrences` is how many times `word` followed the key in the ingested
/// text. A candidate list holding the same word three times is stored as a
/// single transition with `occurrences == 3`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
	word: String,
	syllables: usize,
	occurrences: usize,
}

impl Transition {
	/// The word exactly as it appeared in the corpus (case and punctuation kept).
	pub fn word(&self) -> &str {
		&self.word
	}

	/// Estimated syllable count of the word, always strictly positive.
	pub fn syllables(&self) -> usize {
		self.syllables
	}

	/// Number of times this word followed the key.
	pub fn occurrences(&self) -> usize {
		self.occurrences
	}
}

/// Represents the candidate list of a context key in a word n-gram model.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Keep transitions in first-seen order so sampling is reproducible
/// - Merge with the state of the same key from another model
///
/// ## Invariants
/// - Each word appears in at most one transition
/// - Each transition occurrence count is strictly positive
/// - A state may be empty: the key was seen, but only zero-syllable words followed it
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	/// Outgoing transitions in first-seen order.
	transitions: Vec<Transition>,
	/// Position of each word in `transitions`.
	index: HashMap<String, usize>,
}

impl State {
	/// Creates a new empty state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of `word` following this state's key.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition(&mut self, word: &str, syllables: usize) {
		self.add_occurrences(word, syllables, 1);
	}

	fn add_occurrences(&mut self, word: &str, syllables: usize, occurrences: usize) {
		match self.index.get(word) {
			Some(position) => self.transitions[*position].occurrences += occurrences,
			None => {
				self.index.insert(word.to_owned(), self.transitions.len());
				self.transitions.push(Transition { word: word.to_owned(), syllables, occurrences });
			}
		}
	}

	/// Outgoing transitions in first-seen order.
	pub fn transitions(&self) -> &[Transition] {
		&self.transitions
	}

	/// Total number of observations, duplicates included.
	pub fn total(&self) -> usize {
		self.transitions.iter().map(Transition::occurrences).sum()
	}

	/// Returns `true` if nothing qualifying ever followed the key.
	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Merges another state of the same key into this one.
	///
	/// Occurrence counts are summed; words unknown to `self` are appended in
	/// `other`'s order, which is what ingesting `other`'s text after `self`'s
	/// would have produced.
	pub fn merge(&mut self, other: &Self) {
		for transition in &other.transitions {
			self.add_occurrences(&transition.word, transition.syllables, transition.occurrences);
		}
	}
}

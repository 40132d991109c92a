use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::dictionary::Dictionary;
use super::rules;

/// Syllable count given to tokens without any letter (numbers, dates, bare
/// punctuation). It is larger than any haiku line, so such tokens can never
/// be picked to fill one.
pub const LETTERLESS_SYLLABLES: usize = 18;

/// Counts syllables in English tokens.
///
/// Lookups go to the phonetic dictionary first. Words it does not know are
/// guessed with pattern rules, and the guess is remembered for the lifetime
/// of the counter (guess once, cache forever). Guesses live in memory only.
///
/// ## Invariants
/// - Every word ever counted is present in `words` afterwards
/// - `words` only grows
///
/// # Example
/// ```
/// use pyku_core::syllable::counter::SyllableCounter;
///
/// let mut counter = SyllableCounter::new();
/// assert_eq!(counter.syllables("Hello there!"), 3);
/// assert_eq!(counter.syllables("1999"), 18);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SyllableCounter {
	/// Uppercase, letters-only word to syllable count.
	words: HashMap<String, usize>,
	/// How many words had to be guessed by this instance.
	#[serde(skip)]
	guessed: usize,
}

impl SyllableCounter {
	/// Creates a counter without a dictionary: every word will be guessed.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a counter seeded from a phonetic dictionary.
	pub fn with_dictionary(dictionary: Dictionary) -> Self {
		Self { words: dictionary.into_words(), guessed: 0 }
	}

	/// Counts the syllables of an arbitrary token.
	///
	/// The token is uppercased, apostrophes are dropped (`don't` → `DONT`),
	/// and it is split on anything that is not a letter; the parts are
	/// counted separately and summed (`well-known` → `WELL` + `KNOWN`).
	///
	/// Tokens without any letter count as [`LETTERLESS_SYLLABLES`].
	pub fn syllables(&mut self, token: &str) -> usize {
		let normalized = token.to_uppercase().replace('\'', "");
		let words: Vec<&str> = normalized
			.split(|c: char| !c.is_ascii_uppercase())
			.filter(|word| !word.is_empty())
			.collect();

		if words.is_empty() {
			return LETTERLESS_SYLLABLES;
		}

		words.into_iter().map(|word| self.single_word_syllables(word)).sum()
	}

	/// Counts a single normalized word, guessing and caching it if unknown.
	fn single_word_syllables(&mut self, word: &str) -> usize {
		if let Some(count) = self.words.get(word) {
			return *count;
		}

		let guess = rules::guess(word);
		log::debug!(target: "pyku::syllable", "word not in dictionary: {word:?}, guessed {guess} syllables");
		self.words.insert(word.to_owned(), guess);
		self.guessed += 1;
		guess
	}

	/// Returns `true` if the normalized word is already known, either from
	/// the dictionary or from an earlier guess.
	pub fn knows(&self, word: &str) -> bool {
		self.words.contains_key(&word.to_uppercase().replace('\'', ""))
	}

	/// Number of known words (dictionary entries plus cached guesses).
	pub fn len(&self) -> usize {
		self.words.len()
	}

	/// Returns `true` if no word is known yet.
	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	/// Number of words this instance had to guess.
	pub fn guessed(&self) -> usize {
		self.guessed
	}

	/// Adds the words known by `other` but not by `self`.
	///
	/// Used when merging chains built in parallel: each worker guesses on
	/// its own copy.
	pub(crate) fn merge(&mut self, other: &Self) {
		for (word, count) in &other.words {
			if !self.words.contains_key(word) {
				self.words.insert(word.clone(), *count);
				self.guessed += 1;
			}
		}
	}
}

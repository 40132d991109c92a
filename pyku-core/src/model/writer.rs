use std::collections::VecDeque;
use std::fmt;

use super::markov_chain::MarkovChain;
use super::picker::{WordPicker, pick_weighted};
use super::state::Transition;
use crate::error::{Error, Result};

/// Syllables per line of a haiku.
pub const HAIKU: [usize; 3] = [5, 7, 5];

/// A generated poem: lines of words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verse {
	lines: Vec<Vec<String>>,
}

impl Verse {
	/// The words of each line.
	pub fn lines(&self) -> &[Vec<String>] {
		&self.lines
	}

	/// Every word of the poem, in order.
	pub fn words(&self) -> impl Iterator<Item = &str> {
		self.lines.iter().flatten().map(String::as_str)
	}
}

/// Lines joined by `\n`, words by a single space.
impl fmt::Display for Verse {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let lines: Vec<String> = self.lines.iter().map(|line| line.join(" ")).collect();
		f.write_str(&lines.join("\n"))
	}
}

/// Writes verse by walking a `MarkovChain` under syllable constraints.
///
/// # Behavior
/// - Each line must reach its syllable target exactly; words that would
///   overshoot are never considered.
/// - The very first word must start with a capital letter (leading
///   punctuation is skipped).
/// - On the last line, a word that completes the line must end with `.`,
///   `?` or `!`, optionally followed by a quote.
/// - The context is the last `max_order` words written so far, carried from
///   one line to the next. It is shorter only at the very beginning.
///
/// The writer holds no state of its own: every call starts from an empty
/// context, and randomness comes from the caller's `WordPicker`.
#[derive(Debug, Clone, Copy)]
pub struct Writer<'a> {
	chain: &'a MarkovChain,
}

impl<'a> Writer<'a> {
	pub fn new(chain: &'a MarkovChain) -> Self {
		Self { chain }
	}

	/// Generates a 5/7/5 haiku.
	///
	/// # Errors
	/// Returns `Unsatisfiable` when at some point no word fits. Nothing is
	/// retried here; calling again with the same picker is a new attempt.
	pub fn haiku<P: WordPicker + ?Sized>(&self, picker: &mut P) -> Result<Verse> {
		self.verse(&HAIKU, picker)
	}

	/// Generates a poem with one line per entry of `pattern`, each line
	/// holding exactly that many syllables.
	///
	/// # Errors
	/// Returns `Unsatisfiable` when at some point no word fits.
	pub fn verse<P: WordPicker + ?Sized>(&self, pattern: &[usize], picker: &mut P) -> Result<Verse> {
		let mut context = VecDeque::with_capacity(self.chain.max_order() + 1);
		let mut lines = Vec::with_capacity(pattern.len());

		for (index, syllables) in pattern.iter().enumerate() {
			let first = index == 0;
			let last = index + 1 == pattern.len();
			lines.push(self.line(*syllables, &mut context, first, last, picker)?);
		}

		Ok(Verse { lines })
	}

	/// Returns the words of one line.
	///
	/// - `syllables`: how many syllables (total) the words must have
	/// - `context`: words written before, updated as words are added
	/// - `first`: the first word of this line opens the poem
	/// - `last`: this line closes the poem
	fn line<P: WordPicker + ?Sized>(
		&self,
		syllables: usize,
		context: &mut VecDeque<String>,
		mut first: bool,
		last: bool,
		picker: &mut P,
	) -> Result<Vec<String>> {
		let max_order = self.chain.max_order();
		let mut words = Vec::new();
		let mut remaining = syllables;

		while remaining > 0 {
			let transition = self.random_word(remaining, context.make_contiguous(), first, last, picker)?;
			remaining -= transition.syllables();
			words.push(transition.word().to_owned());

			context.push_back(transition.word().to_owned());
			while context.len() > max_order {
				context.pop_front();
			}
			first = false;
		}

		Ok(words)
	}

	/// Picks a word following `context` that fits in `remaining` syllables.
	fn random_word<P: WordPicker + ?Sized>(
		&self,
		remaining: usize,
		context: &[String],
		first: bool,
		last: bool,
		picker: &mut P,
	) -> Result<&'a Transition> {
		let candidates: Vec<&Transition> = self
			.chain
			.query(context)?
			.iter()
			.filter(|transition| fits(transition, remaining, first, last))
			.collect();

		if candidates.is_empty() {
			return Err(Error::Unsatisfiable { remaining, context: context.to_vec(), first, last });
		}

		Ok(pick_weighted(&candidates, picker))
	}
}

/// Determines if a transition is appropriate at this point of the poem.
fn fits(transition: &Transition, remaining: usize, first: bool, last: bool) -> bool {
	let syllables = transition.syllables();
	if syllables > remaining {
		return false;
	}
	if first && !starts_capitalized(transition.word()) {
		return false;
	}
	if last && syllables == remaining && !ends_sentence(transition.word()) {
		return false;
	}
	true
}

/// `true` if the first letter of `word` is uppercase (`"Old`, `(The`).
fn starts_capitalized(word: &str) -> bool {
	word.chars().find(|c| c.is_alphabetic()).is_some_and(char::is_uppercase)
}

/// `true` if `word` ends in `.`, `?` or `!`, optionally followed by one quote.
fn ends_sentence(word: &str) -> bool {
	let word = word.strip_suffix(['\'', '"']).unwrap_or(word);
	word.ends_with(['.', '?', '!'])
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::picker::RandomPicker;
	use crate::syllable::counter::SyllableCounter;
	use crate::syllable::dictionary::Dictionary;

	/// Always picks the first candidate.
	struct First;

	impl WordPicker for First {
		fn pick(&mut self, _n: usize) -> usize {
			0
		}
	}

	fn chain(max_order: usize, dictionary: &[(&str, usize)], texts: &[&str]) -> MarkovChain {
		let dictionary: Dictionary = dictionary.iter().copied().collect();
		let mut chain = MarkovChain::with_counter(max_order, SyllableCounter::with_dictionary(dictionary));
		for text in texts {
			chain.ingest(text);
		}
		chain
	}

	#[test]
	fn capitalization_skips_leading_punctuation() {
		assert!(starts_capitalized("Old"));
		assert!(starts_capitalized("\"Old"));
		assert!(starts_capitalized("(Old"));
		assert!(!starts_capitalized("old"));
		assert!(!starts_capitalized("1st"));
		assert!(!starts_capitalized("1999"));
	}

	#[test]
	fn sentence_endings() {
		assert!(ends_sentence("pond."));
		assert!(ends_sentence("pond?"));
		assert!(ends_sentence("pond!'"));
		assert!(ends_sentence("pond.\""));
		assert!(!ends_sentence("pond"));
		assert!(!ends_sentence("pond,"));
		assert!(!ends_sentence("pond.''"));
	}

	#[test]
	fn fits_rejects_overshoot() {
		let chain = chain(0, &[("silently", 3)], &["silently"]);
		let transition = &chain.query(&[]).unwrap()[0];
		assert!(fits(transition, 3, false, false));
		assert!(!fits(transition, 2, false, false));
	}

	#[test]
	fn fits_only_checks_ending_on_the_closing_word() {
		let chain = chain(0, &[("frog", 1)], &["frog"]);
		let transition = &chain.query(&[]).unwrap()[0];
		// Not closing the line: no punctuation needed
		assert!(fits(transition, 2, false, true));
		// Closing the poem: must end a sentence
		assert!(!fits(transition, 1, false, true));
	}

	#[test]
	fn single_path_haiku() {
		let words = [
			"Old", "pond", "frogs", "leap", "in", "sound", "of", "the", "cold", "deep", "lake", "at", "dusk", "wind", "blows", "fast", "now.",
		];
		let dictionary: Vec<(&str, usize)> = words.iter().map(|w| (*w, 1)).collect();
		let text = words.join(" ");
		let chain = chain(1, &dictionary, &[&text, &text]);

		let haiku = Writer::new(&chain).haiku(&mut First).unwrap();
		assert_eq!(
			haiku.to_string(),
			"Old pond frogs leap in\nsound of the cold deep lake at\ndusk wind blows fast now."
		);
		assert_eq!(haiku.lines().len(), 3);
		assert_eq!(haiku.words().count(), 17);
	}

	#[test]
	fn context_carries_across_lines() {
		// With max order 2, the second line starts from the last two words of the first
		let dictionary = [("Frogs", 2), ("leap", 3), ("far", 1), ("away.", 1), ("now.", 1), ("in", 1)];
		let chain = chain(2, &dictionary, &["Frogs leap far away.", "in leap far now."]);

		let verse = Writer::new(&chain).verse(&[5, 2], &mut First);
		// "leap far" is followed by both "away." and "now."; First picks "away."
		assert_eq!(verse.unwrap().to_string(), "Frogs leap\nfar away.");
	}

	#[test]
	fn lowercase_corpus_cannot_start() {
		let chain = chain(1, &[], &["an old silent pond"]);
		let result = Writer::new(&chain).haiku(&mut RandomPicker::seeded(1));
		assert!(matches!(
			result,
			Err(Error::Unsatisfiable { remaining: 5, first: true, last: false, .. })
		));
	}

	#[test]
	fn missing_ending_is_unsatisfiable() {
		let chain = chain(0, &[("Frog", 1)], &["Frog"]);
		let result = Writer::new(&chain).haiku(&mut First);
		assert!(matches!(result, Err(Error::Unsatisfiable { remaining: 1, last: true, .. })));
	}

	#[test]
	fn empty_pattern_is_an_empty_verse() {
		let chain = chain(1, &[], &[]);
		let verse = Writer::new(&chain).verse(&[], &mut First).unwrap();
		assert_eq!(verse.to_string(), "");
	}
}

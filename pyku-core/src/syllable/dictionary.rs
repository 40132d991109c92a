use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::io::read_text;

/// Trailing pronunciation-variant marker, as in `READ(2)`.
static VARIANT_SUFFIX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\(\d+\)$").expect("variant suffix pattern must compile"));

/// Word-to-syllable map seeded from a phonetic transcription file.
///
/// Keys are uppercase and contain letters only (apostrophes are stripped).
///
/// ## Sources
/// - Raw transcription (CMU style): `WORD  PH0 PH1 ...`, one entry per line.
///   Each stress digit (`0`, `1`, `2`) in the phonemes marks one syllable.
/// - Parsed cache: `WORD count`, one entry per line. It is regenerated from
///   the raw file whenever it is missing, so it is safe to delete.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
	words: HashMap<String, usize>,
}

impl Dictionary {
	/// Creates an empty dictionary. Every lookup will fall back to guessing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads the parsed cache when it exists, otherwise parses the raw
	/// transcription file and writes the cache for subsequent runs.
	///
	/// # Errors
	/// Returns an error if the needed file cannot be read or the cache
	/// cannot be written.
	pub fn load_or_build<PR, PC>(raw_path: PR, cache_path: PC) -> Result<Self>
	where
		PR: AsRef<Path>,
		PC: AsRef<Path>,
	{
		let cache_path = cache_path.as_ref();
		if cache_path.exists() {
			return Self::load_cache(cache_path);
		}

		let dictionary = Self::parse_raw_file(&raw_path)?;
		dictionary.save_cache(cache_path)?;
		log::info!(
			"parsed {} dictionary words from {}, cached in {}",
			dictionary.len(),
			raw_path.as_ref().display(),
			cache_path.display()
		);
		Ok(dictionary)
	}

	/// Parses a raw transcription file.
	pub fn parse_raw_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::parse_raw(&read_text(path)?))
	}

	/// Parses raw transcription text.
	///
	/// Lines that are comments, punctuation entries or otherwise malformed
	/// are skipped. When a word has several pronunciations, the smallest
	/// syllable count wins.
	pub fn parse_raw(text: &str) -> Self {
		let mut dictionary = Self::new();
		for (word, syllables) in text.lines().filter_map(parse_raw_line) {
			dictionary
				.words
				.entry(word)
				.and_modify(|count| *count = (*count).min(syllables))
				.or_insert(syllables);
		}
		dictionary
	}

	/// Loads a parsed cache file.
	pub fn load_cache<P: AsRef<Path>>(path: P) -> Result<Self> {
		let dictionary = Self::parse_cache(&read_text(&path)?);
		log::info!("loaded {} dictionary words from {}", dictionary.len(), path.as_ref().display());
		Ok(dictionary)
	}

	/// Parses parsed-cache text (`WORD count` per line).
	///
	/// Unreadable lines are dropped with a warning; the cache is only a
	/// performance aid.
	pub fn parse_cache(text: &str) -> Self {
		let mut words = HashMap::new();
		for (number, line) in text.lines().enumerate() {
			if line.trim().is_empty() {
				continue;
			}
			let entry = line
				.split_once(' ')
				.and_then(|(word, count)| Some((word, count.trim().parse::<usize>().ok()?)));
			match entry {
				Some((word, count)) => {
					words.insert(word.to_owned(), count);
				}
				None => log::warn!("skipping malformed dictionary cache line {}: {:?}", number + 1, line),
			}
		}
		Self { words }
	}

	/// Writes the parsed cache, sorted by word.
	pub fn save_cache<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let mut entries: Vec<(&String, &usize)> = self.words.iter().collect();
		entries.sort();

		let mut writer = BufWriter::new(File::create(path)?);
		for (word, count) in entries {
			writeln!(writer, "{word} {count}")?;
		}
		writer.flush()?;
		Ok(())
	}

	/// Returns the stored count for an already normalized word.
	pub fn get(&self, word: &str) -> Option<usize> {
		self.words.get(word).copied()
	}

	/// Number of words in the dictionary.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	/// Returns `true` if the dictionary holds no word.
	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub(crate) fn into_words(self) -> HashMap<String, usize> {
		self.words
	}
}

/// Builds a dictionary from `(word, syllables)` pairs.
///
/// Words are normalized the same way raw entries are: uppercased, with
/// everything but letters removed.
impl<S: AsRef<str>> FromIterator<(S, usize)> for Dictionary {
	fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
		let words = iter
			.into_iter()
			.map(|(word, count)| {
				let word: String = word.as_ref().to_uppercase().chars().filter(char::is_ascii_uppercase).collect();
				(word, count)
			})
			.filter(|(word, _)| !word.is_empty())
			.collect();
		Self { words }
	}
}

/// Parses one raw transcription line into `(word, syllables)`.
///
/// Returns `None` for comments, symbol entries and lines missing the
/// two-space field separator.
fn parse_raw_line(line: &str) -> Option<(String, usize)> {
	// Comments and punctuation entries do not start with a letter
	if !line.starts_with(|c: char| c.is_ascii_uppercase()) {
		return None;
	}

	let (word, phonemes) = line.split_once("  ")?;
	let word = VARIANT_SUFFIX.replace(word, "");
	if word.chars().any(|c| !c.is_ascii_uppercase() && c != '\'') {
		return None;
	}

	let word: String = word.chars().filter(char::is_ascii_uppercase).collect();
	let syllables = phonemes.chars().filter(|c| matches!(c, '0' | '1' | '2')).count();
	Some((word, syllables))
}

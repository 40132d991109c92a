use std::collections::HashSet;
use std::path::Path;
use std::thread;

use serde::{Deserialize, Serialize};

use super::ngram_model::NGramModel;
use super::state::Transition;
use crate::error::{Error, Result};
use crate::io::{build_output_path, read_text};
use crate::source::{SourceLocation, TextSource};
use crate::syllable::counter::SyllableCounter;

/// Variable-order word Markov chain annotated with syllable counts.
///
/// This struct manages:
/// - `chains`: one `NGramModel` per order, from 0 to `max_order` inclusive.
/// - `sources`: identifiers of texts already ingested (used to ingest each source once).
/// - `counter`: the syllable counter every candidate word goes through.
///
/// Ingestion is append-only: learned transitions are never removed, except by
/// [`MarkovChain::reset_max_order`], which throws every table away.
///
/// # Example
/// ```
/// use pyku_core::model::markov_chain::MarkovChain;
///
/// let mut chain = MarkovChain::new(1);
/// chain.ingest("Hello there. How are you.");
///
/// let after_how = chain.query(&["How".to_owned()]).unwrap();
/// assert_eq!(after_how[0].word(), "are");
/// assert_eq!(after_how[0].syllables(), 1);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MarkovChain {
	max_order: usize,
	chains: Vec<NGramModel>,
	sources: HashSet<String>,
	counter: SyllableCounter,
}

impl MarkovChain {
	/// Creates an empty chain whose counter knows no dictionary word.
	pub fn new(max_order: usize) -> Self {
		Self::with_counter(max_order, SyllableCounter::new())
	}

	/// Creates an empty chain using `counter` for every candidate word.
	pub fn with_counter(max_order: usize, counter: SyllableCounter) -> Self {
		Self {
			max_order,
			chains: Self::empty_chains(max_order),
			sources: HashSet::new(),
			counter,
		}
	}

	fn empty_chains(max_order: usize) -> Vec<NGramModel> {
		(0..=max_order).map(NGramModel::new).collect()
	}

	/// Loads the chain snapshot stored next to a corpus file if it exists,
	/// otherwise ingests the corpus and writes the snapshot.
	///
	/// - `filepath` is the input text file; the snapshot is `<stem>.bin`.
	/// - A snapshot built with another `max_order` is rebuilt.
	/// - A loaded snapshot brings its own counter; `counter` is only used
	///   when the corpus has to be ingested.
	///
	/// # Errors
	/// Returns an error if the corpus cannot be read or the snapshot cannot
	/// be decoded or written.
	pub fn from_corpus_file<P: AsRef<Path>>(filepath: P, max_order: usize, counter: SyllableCounter) -> Result<Self> {
		let snapshot_path = build_output_path(&filepath, "bin")?;
		if snapshot_path.exists() {
			let chain = Self::load(&snapshot_path)?;
			if chain.max_order == max_order {
				return Ok(chain);
			}
			log::info!(
				"snapshot {} has max order {}, rebuilding for {}",
				snapshot_path.display(),
				chain.max_order,
				max_order
			);
		}

		let mut chain = Self::with_counter(max_order, counter);
		chain.ingest_file(&filepath)?;
		chain.save(&snapshot_path)?;
		Ok(chain)
	}

	/// Maximum order (number of context words) of the chain.
	pub fn max_order(&self) -> usize {
		self.max_order
	}

	/// The syllable counter shared by every ingestion.
	pub fn counter(&self) -> &SyllableCounter {
		&self.counter
	}

	/// Counts syllables with the chain's counter, caching guesses.
	pub fn syllables(&mut self, word: &str) -> usize {
		self.counter.syllables(word)
	}

	/// Returns the table of order `n`.
	///
	/// # Errors
	/// Returns `OrderOutOfRange` if `n` is greater than the maximum order.
	pub fn order(&self, n: usize) -> Result<&NGramModel> {
		self.chains.get(n).ok_or(Error::OrderOutOfRange { order: n, max_order: self.max_order })
	}

	/// Changes the maximum order.
	///
	/// Every learned table is discarded, and so are the ingested source
	/// identifiers, so the caller can ingest the same sources again to
	/// rebuild. The syllable counter keeps its words.
	pub fn reset_max_order(&mut self, max_order: usize) {
		self.max_order = max_order;
		self.chains = Self::empty_chains(max_order);
		self.sources.clear();
	}

	/// Adds some text to the chain.
	///
	/// The text is split on whitespace runs and every order learns from it.
	/// Calling this twice with the same text counts everything twice; use
	/// [`MarkovChain::ingest_from_source`] for idempotent ingestion.
	pub fn ingest(&mut self, text: &str) {
		let counter = &mut self.counter;
		let words: Vec<(&str, usize)> = text.split_whitespace().map(|word| (word, counter.syllables(word))).collect();

		for chain in &mut self.chains {
			chain.add_words(&words);
		}
	}

	/// Adds some text unless a text with the same `id` was already ingested.
	///
	/// Returns `true` if the text was ingested.
	pub fn ingest_from_source(&mut self, id: &str, text: &str) -> bool {
		if self.sources.contains(id) {
			return false;
		}
		self.ingest(text);
		self.sources.insert(id.to_owned());
		true
	}

	/// Ingests a text file, using its path as the source identifier.
	///
	/// Returns `true` if the file was ingested, `false` if it already was.
	pub fn ingest_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<bool> {
		let id = filepath.as_ref().to_string_lossy().to_string();
		if self.sources.contains(&id) {
			return Ok(false);
		}
		let text = read_text(&filepath)?;
		Ok(self.ingest_from_source(&id, &text))
	}

	/// Ingests every text of a source at the requested granularity.
	///
	/// Returns how many texts were new.
	pub fn ingest_source<S: TextSource + ?Sized>(&mut self, source: &mut S, location: SourceLocation) -> Result<usize> {
		let mut ingested = 0;
		for text in source.texts(location)? {
			if self.ingest_from_source(&text.id, &text.text) {
				ingested += 1;
			}
		}
		log::info!("ingested {ingested} new texts");
		Ok(ingested)
	}

	/// Ingests many texts using one worker thread per chunk.
	///
	/// # Behavior
	/// - Splits the texts into chunks (based on CPU cores * factor).
	/// - Each worker builds a partial chain with a copy of the counter.
	/// - Partial chains are merged back in chunk order, so the result is the
	///   same as calling [`MarkovChain::ingest`] on every text in turn.
	///
	/// # Notes
	/// A panicking worker is resumed on the calling thread.
	pub fn ingest_many(&mut self, texts: &[String]) -> Result<()> {
		if texts.is_empty() {
			return Ok(());
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = texts.len().div_ceil(chunks);

		let mut workers = Vec::new();
		for chunk in texts.chunks(chunk_size) {
			let chunk: Vec<String> = chunk.to_vec();
			let mut partial = Self::with_counter(self.max_order, self.counter.clone());

			workers.push(thread::spawn(move || {
				for text in &chunk {
					partial.ingest(text);
				}
				partial
			}));
		}

		let workers_count = workers.len();
		for worker in workers {
			match worker.join() {
				Ok(partial) => self.merge(&partial)?,
				Err(panic) => std::panic::resume_unwind(panic),
			}
		}

		log::info!("ingested {} texts with {} workers", texts.len(), workers_count);
		Ok(())
	}

	/// Returns the words that followed `context` in the corpus.
	///
	/// The table used is the one whose order equals `context.len()`, and the
	/// lookup is exact: no shorter context is tried when nothing is found.
	///
	/// # Errors
	/// Returns `OrderOutOfRange` if `context` is longer than the maximum order.
	pub fn query(&self, context: &[String]) -> Result<&[Transition]> {
		Ok(self.order(context.len())?.get(context))
	}

	/// Returns `true` if a source with this identifier was already ingested.
	pub fn has_source(&self, id: &str) -> bool {
		self.sources.contains(id)
	}

	/// Merges another chain into this one.
	///
	/// # Behavior
	/// - Each order is merged: matching transitions sum their occurrences.
	/// - Source identifiers and counter words are added.
	///
	/// # Errors
	/// Returns `OrderMismatch` if the maximum orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.max_order != other.max_order {
			return Err(Error::OrderMismatch { expected: self.max_order, found: other.max_order });
		}

		for (chain, other_chain) in self.chains.iter_mut().zip(&other.chains) {
			chain.merge(other_chain)?;
		}
		self.sources.extend(other.sources.iter().cloned());
		self.counter.merge(&other.counter);

		Ok(())
	}

	/// Writes a binary snapshot of the chain (postcard encoding).
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(&path, bytes)?;
		log::info!("saved chain snapshot to {}", path.as_ref().display());
		Ok(())
	}

	/// Reads a binary snapshot written by [`MarkovChain::save`].
	///
	/// # Errors
	/// Returns an error if the file cannot be read or decoded, or if its
	/// tables do not match its maximum order.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(&path)?;
		let chain: Self = postcard::from_bytes(&bytes)?;
		if chain.chains.len() != chain.max_order + 1 {
			return Err(Error::OrderMismatch { expected: chain.max_order + 1, found: chain.chains.len() });
		}
		log::info!("loaded chain snapshot from {}", path.as_ref().display());
		Ok(chain)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::source::SourceText;

	fn key(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| (*w).to_owned()).collect()
	}

	fn entries(chain: &MarkovChain, context: &[&str]) -> Vec<(String, usize, usize)> {
		chain
			.query(&key(context))
			.unwrap()
			.iter()
			.map(|t| (t.word().to_owned(), t.syllables(), t.occurrences()))
			.collect()
	}

	fn entry(word: &str, syllables: usize, occurrences: usize) -> (String, usize, usize) {
		(word.to_owned(), syllables, occurrences)
	}

	#[test]
	fn hello_there_first_order() {
		let mut chain = MarkovChain::new(1);
		chain.ingest("Hello there. How are you.");

		let unigrams = entries(&chain, &[]);
		assert_eq!(unigrams.len(), 5);
		assert_eq!(unigrams[0], entry("Hello", 2, 1));

		assert_eq!(entries(&chain, &["Hello"]), vec![entry("there.", 1, 1)]);
		assert_eq!(entries(&chain, &["there."]), vec![entry("How", 1, 1)]);
		assert_eq!(entries(&chain, &["How"]), vec![entry("are", 1, 1)]);
		assert_eq!(entries(&chain, &["are"]), vec![entry("you.", 1, 1)]);
		assert!(entries(&chain, &["you."]).is_empty());
		assert_eq!(chain.order(1).unwrap().len(), 4);
	}

	#[test]
	fn whitespace_runs_are_one_separator() {
		let mut chain = MarkovChain::new(1);
		chain.ingest("  Old\tpond \n\n frogs ");
		assert_eq!(entries(&chain, &["Old"]), vec![entry("pond", 1, 1)]);
		assert_eq!(entries(&chain, &[]).len(), 3);
	}

	#[test]
	fn query_beyond_max_order_fails() {
		let chain = MarkovChain::new(1);
		let result = chain.query(&key(&["old", "pond"]));
		assert!(matches!(result, Err(Error::OrderOutOfRange { order: 2, max_order: 1 })));
	}

	#[test]
	fn unknown_context_is_empty() {
		let mut chain = MarkovChain::new(2);
		chain.ingest("an old silent pond");
		assert!(entries(&chain, &["silent", "frog"]).is_empty());
	}

	#[test]
	fn letterless_tokens_are_candidates_but_never_fit() {
		let mut chain = MarkovChain::new(1);
		chain.ingest("summer 1999 ended");
		assert_eq!(entries(&chain, &["summer"]), vec![entry("1999", 18, 1)]);
		assert_eq!(entries(&chain, &["1999"]), vec![entry("ended", 2, 1)]);
	}

	#[test]
	fn ingest_twice_doubles_counts() {
		let mut chain = MarkovChain::new(1);
		chain.ingest("old pond");
		chain.ingest("old pond");
		assert_eq!(entries(&chain, &["old"]), vec![entry("pond", 1, 2)]);
		assert_eq!(entries(&chain, &[]), vec![entry("old", 1, 2), entry("pond", 1, 2)]);
	}

	#[test]
	fn ingest_from_source_is_idempotent() {
		let mut once = MarkovChain::new(2);
		assert!(once.ingest_from_source("a", "an old silent pond"));

		let mut twice = MarkovChain::new(2);
		assert!(twice.ingest_from_source("a", "an old silent pond"));
		assert!(!twice.ingest_from_source("a", "an old silent pond"));

		for n in 0..=2 {
			assert_eq!(once.order(n).unwrap(), twice.order(n).unwrap());
		}
		assert!(twice.has_source("a"));
	}

	#[test]
	fn reset_discards_tables_and_sources() {
		let mut chain = MarkovChain::new(1);
		chain.ingest_from_source("a", "old pond");
		chain.reset_max_order(2);

		assert_eq!(chain.max_order(), 2);
		assert!(entries(&chain, &[]).is_empty());
		assert!(chain.order(2).unwrap().is_empty());
		assert!(chain.ingest_from_source("a", "old pond"));
		// The counter keeps what it learned
		assert!(chain.counter().knows("pond"));
	}

	#[test]
	fn ingest_many_matches_sequential_ingestion() {
		let texts: Vec<String> = (0..40).map(|i| format!("the frog {i} jumps into pond {}", i % 3)).collect();

		let mut sequential = MarkovChain::new(2);
		for text in &texts {
			sequential.ingest(text);
		}

		let mut parallel = MarkovChain::new(2);
		parallel.ingest_many(&texts).unwrap();

		for n in 0..=2 {
			assert_eq!(sequential.order(n).unwrap(), parallel.order(n).unwrap());
		}
		assert!(parallel.counter().knows("frog"));
	}

	#[test]
	fn merge_requires_same_order() {
		let mut left = MarkovChain::new(1);
		let right = MarkovChain::new(3);
		assert!(matches!(left.merge(&right), Err(Error::OrderMismatch { expected: 1, found: 3 })));
	}

	#[test]
	fn snapshot_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("chain.bin");

		let mut chain = MarkovChain::new(2);
		chain.ingest_from_source("a", "an old silent pond. A frog jumps in.");
		chain.save(&path).unwrap();

		let loaded = MarkovChain::load(&path).unwrap();
		assert_eq!(loaded.max_order(), 2);
		assert!(loaded.has_source("a"));
		for n in 0..=2 {
			assert_eq!(chain.order(n).unwrap(), loaded.order(n).unwrap());
		}
	}

	#[test]
	fn from_corpus_file_writes_and_reuses_snapshot() {
		let dir = tempfile::tempdir().unwrap();
		let corpus = dir.path().join("pond.txt");
		std::fs::write(&corpus, "An old silent pond.").unwrap();

		let built = MarkovChain::from_corpus_file(&corpus, 1, SyllableCounter::new()).unwrap();
		assert!(dir.path().join("pond.bin").exists());

		// The snapshot is used even once the corpus is gone
		std::fs::remove_file(&corpus).unwrap();
		let loaded = MarkovChain::from_corpus_file(&corpus, 1, SyllableCounter::new()).unwrap();
		assert_eq!(built.order(1).unwrap(), loaded.order(1).unwrap());

		// A different order needs the corpus again
		assert!(MarkovChain::from_corpus_file(&corpus, 2, SyllableCounter::new()).is_err());
	}

	#[test]
	fn ingest_file_is_idempotent() {
		let dir = tempfile::tempdir().unwrap();
		let corpus = dir.path().join("pond.txt");
		std::fs::write(&corpus, "old pond").unwrap();

		let mut chain = MarkovChain::new(1);
		assert!(chain.ingest_file(&corpus).unwrap());
		assert!(!chain.ingest_file(&corpus).unwrap());
		assert_eq!(entries(&chain, &["old"]), vec![entry("pond", 1, 1)]);
	}

	struct Fixed(Vec<SourceText>);

	impl TextSource for Fixed {
		fn texts(&mut self, _location: SourceLocation) -> Result<Vec<SourceText>> {
			Ok(self.0.clone())
		}
	}

	#[test]
	fn ingest_source_counts_new_texts() {
		let mut source = Fixed(vec![
			SourceText { id: "1".to_owned(), text: "old pond".to_owned() },
			SourceText { id: "2".to_owned(), text: "frog jumps".to_owned() },
			SourceText { id: "1".to_owned(), text: "old pond".to_owned() },
		]);

		let mut chain = MarkovChain::new(1);
		assert_eq!(chain.ingest_source(&mut source, SourceLocation::Posts).unwrap(), 2);
		assert_eq!(chain.ingest_source(&mut source, SourceLocation::Posts).unwrap(), 0);
		assert_eq!(entries(&chain, &["old"]), vec![entry("pond", 1, 1)]);
	}
}

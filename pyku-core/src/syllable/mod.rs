//! Syllable estimation for arbitrary English tokens.
//!
//! This module provides:
//! - The phonetic dictionary (raw transcription parsing and the parsed cache)
//! - A memoizing counter that falls back to heuristic guesses for unknown words
//! - The heuristic rule tables themselves

/// Word-to-syllable dictionary built from a phonetic transcription file.
pub mod dictionary;

/// Memoizing syllable counter used by the Markov chain.
pub mod counter;

/// Pattern tables used to guess syllables for words missing from the dictionary.
///
/// Not exposed
mod rules;

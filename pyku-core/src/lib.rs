//! Markov-chain haiku generation library.
//!
//! This crate provides:
//! - Syllable estimation backed by a phonetic dictionary, with heuristic guesses
//! - A variable-order word Markov chain annotated with syllable counts
//! - A writer producing 5/7/5 haiku (or any syllable pattern) from the chain
//! - Settings and a text source boundary for runners
//!
//! # Example
//! ```
//! use pyku_core::model::markov_chain::MarkovChain;
//! use pyku_core::model::picker::RandomPicker;
//! use pyku_core::model::writer::Writer;
//!
//! let mut chain = MarkovChain::new(2);
//! chain.ingest("Old pond, a frog jumps in. The sound of water.");
//!
//! // Small corpora often cannot fill a haiku; callers decide whether to retry
//! let result = Writer::new(&chain).haiku(&mut RandomPicker::seeded(3));
//! if let Ok(haiku) = result {
//!     assert_eq!(haiku.lines().len(), 3);
//! }
//! ```

/// Core chain models and generation logic.
pub mod model;

/// Syllable counting (dictionary, cache and heuristic rules).
pub mod syllable;

/// Error type shared by the whole crate.
pub mod error;

/// Runner settings loaded from TOML.
pub mod config;

/// Text source boundary and the directory-backed implementation.
pub mod source;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Error, Result};

//! Top-level module for the haiku generation system.
//!
//! This module provides:
//! - Fixed-order word n-gram tables (`NGramModel`)
//! - The variable-order chain combining them (`MarkovChain`)
//! - Per-key candidate lists (`State`, `Transition`)
//! - The injectable random source (`WordPicker`)
//! - The constrained verse writer (`Writer`)

/// Constrained verse generation walking a `MarkovChain`.
///
/// Enforces per-line syllable targets, an opening capital and a closing
/// sentence ending.
pub mod writer;

/// Variable-order Markov chain made of one `NGramModel` per order.
///
/// Supports idempotent per-source ingestion, parallel bulk ingestion,
/// merging, and binary snapshots.
pub mod markov_chain;

/// Fixed-order word n-gram table (`n >= 0`).
///
/// Handles window sliding over tokenized text, exact-key lookup
/// and model merging.
pub mod ngram_model;

/// Candidate list of a single context key.
///
/// Tracks outgoing transitions with their syllable counts and occurrences.
pub mod state;

/// Random source used by the writer, and weighted candidate selection.
pub mod picker;

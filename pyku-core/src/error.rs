//! Error types shared by the model, the writer and the configuration layer.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the crate can surface to its caller.
///
/// The syllable estimator never fails, so none of these come from it.
#[derive(Error, Debug)]
pub enum Error {
	/// A context longer than the chain's maximum order was queried.
	#[error("order ({order}) cannot be greater than max order ({max_order})")]
	OrderOutOfRange { order: usize, max_order: usize },

	/// No candidate survived the syllable and boundary filters.
	///
	/// Fatal to the current attempt only; callers may simply try again.
	#[error("no available words (remaining={remaining}, context={context:?}, first={first}, last={last})")]
	Unsatisfiable {
		remaining: usize,
		context: Vec<String>,
		first: bool,
		last: bool,
	},

	/// Two chains (or a chain and a snapshot) disagree on their maximum order.
	#[error("max order mismatch: expected {expected}, found {found}")]
	OrderMismatch { expected: usize, found: usize },

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("snapshot encoding error: {0}")]
	Snapshot(#[from] postcard::Error),

	#[error("configuration error: {0}")]
	Config(String),
}

impl From<toml::de::Error> for Error {
	fn from(err: toml::de::Error) -> Self {
		Error::Config(err.to_string())
	}
}

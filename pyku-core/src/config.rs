use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::read_text;
use crate::source::SourceLocation;

/// Settings consumed by a haiku runner.
///
/// Every field has a default, so a settings file only needs the values it
/// changes:
///
/// ```toml
/// max_order = 3
/// location = "comments"
/// seed = 42
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
	/// Maximum Markov order (number of context words). Must be positive.
	pub max_order: usize,

	/// Granularity of the texts requested from the text source.
	pub location: SourceLocation,

	/// Raw phonetic transcription file.
	pub raw_dictionary: PathBuf,

	/// Parsed dictionary cache, rebuilt from `raw_dictionary` when missing.
	pub parsed_dictionary: PathBuf,

	/// Directory of `.txt` corpus files.
	pub corpus: PathBuf,

	/// How many haiku attempts a runner makes before giving up. Must be positive.
	pub attempts: usize,

	/// Seed for reproducible runs; `None` seeds from the operating system.
	pub seed: Option<u64>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			max_order: 4,
			location: SourceLocation::Posts,
			raw_dictionary: PathBuf::from("data/cmudict-0.7b.txt"),
			parsed_dictionary: PathBuf::from("data/cmudict-parsed.txt"),
			corpus: PathBuf::from("data/corpus"),
			attempts: 25,
			seed: None,
		}
	}
}

impl Settings {
	/// Reads and validates a TOML settings file.
	///
	/// # Errors
	/// Returns an error if the file cannot be read, is not valid TOML,
	/// or holds invalid values.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		Self::parse(&read_text(path)?)
	}

	/// Parses and validates TOML settings.
	pub fn parse(text: &str) -> Result<Self> {
		let settings: Self = toml::from_str(text)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks the values a runner cannot work with.
	pub fn validate(&self) -> Result<()> {
		if self.max_order == 0 {
			return Err(Error::Config("max_order must be a positive integer".to_owned()));
		}
		if self.attempts == 0 {
			return Err(Error::Config("attempts must be a positive integer".to_owned()));
		}
		Ok(())
	}
}

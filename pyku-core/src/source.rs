use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io;

/// Granularity of the texts a source hands out.
///
/// - `Posts`: one text per top-level item (faster, fewer texts).
/// - `Comments`: one text per reply under each item (slower, more text).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceLocation {
	#[default]
	Posts,
	Comments,
}

/// A raw text and the identifier used to ingest it at most once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceText {
	pub id: String,
	pub text: String,
}

/// Anything able to supply corpus texts to a `MarkovChain`.
///
/// Fetching (HTTP listings, pagination, filtering out pinned items...) is the
/// implementor's business; the chain only ingests what is returned.
pub trait TextSource {
	/// Returns every text available at the requested granularity.
	fn texts(&mut self, location: SourceLocation) -> Result<Vec<SourceText>>;
}

/// Reads corpus texts from the `.txt` files of a directory.
///
/// # Granularity
/// - `Posts`: each file is one text, identified by its name (without extension).
/// - `Comments`: each blank-line separated paragraph is one text,
///   identified as `name#index`.
#[derive(Clone, Debug)]
pub struct DirectorySource {
	folder: PathBuf,
}

impl DirectorySource {
	/// Creates a source over `folder`. Both `"folder"` and `"."` are accepted.
	pub fn new<P: AsRef<Path>>(folder: P) -> Self {
		Self { folder: io::normalize_folder(folder.as_ref()) }
	}

	/// The folder the texts are read from.
	pub fn folder(&self) -> &Path {
		&self.folder
	}
}

impl TextSource for DirectorySource {
	fn texts(&mut self, location: SourceLocation) -> Result<Vec<SourceText>> {
		let mut texts = Vec::new();
		for file in io::list_files(&self.folder, "txt")? {
			let path = self.folder.join(&file);
			let name = io::get_filename(&path)?;
			let text = io::read_text(&path)?;

			match location {
				SourceLocation::Posts => texts.push(SourceText { id: name, text }),
				SourceLocation::Comments => {
					for (index, paragraph) in paragraphs(&text).into_iter().enumerate() {
						texts.push(SourceText { id: format!("{name}#{index}"), text: paragraph });
					}
				}
			}
		}
		Ok(texts)
	}
}

/// Splits a text into paragraphs separated by blank lines.
fn paragraphs(text: &str) -> Vec<String> {
	let mut paragraphs = Vec::new();
	let mut current: Vec<&str> = Vec::new();

	for line in text.lines() {
		if line.trim().is_empty() {
			if !current.is_empty() {
				paragraphs.push(current.join("\n"));
				current.clear();
			}
		} else {
			current.push(line);
		}
	}
	if !current.is_empty() {
		paragraphs.push(current.join("\n"));
	}

	paragraphs
}

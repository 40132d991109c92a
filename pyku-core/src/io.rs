use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a whole text file into a `String`.
///
/// Invalid UTF-8 is replaced rather than rejected: the phonetic dictionary
/// ships in Latin-1 and corpora scraped from the web are rarely clean.
pub(crate) fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let bytes = fs::read(filename)?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/corpus.txt` + `"bin"` → `data/corpus.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/corpus/poems.txt"` → `"poems"`
/// - `"poems.txt"` → `"poems"`
pub(crate) fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted so that ingestion order,
/// and therefore generation, does not depend on the filesystem.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

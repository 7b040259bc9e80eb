use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{LmError, Result};

/// Reads a corpus file and returns its whitespace-separated tokens.
///
/// - Reads the entire file into memory
/// - Line breaks carry no meaning, sentences end at the end-marker token
pub fn read_tokens<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let path = filename.as_ref();
	let mut contents = String::new();
	File::open(path)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(|e| LmError::io(path, e))?;
	Ok(contents.split_whitespace().map(str::to_owned).collect())
}

/// Writes `lines` to `filename`, one per line, creating or truncating it.
pub(crate) fn write_lines<P, I, S>(filename: P, lines: I) -> Result<()>
where
	P: AsRef<Path>,
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let path = filename.as_ref();
	let file = File::create(path).map_err(|e| LmError::io(path, e))?;
	let mut writer = BufWriter::new(file);
	for line in lines {
		writeln!(writer, "{}", line.as_ref()).map_err(|e| LmError::io(path, e))?;
	}
	writer.flush().map_err(|e| LmError::io(path, e))
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/corpus.txt` + `"bin"` → `data/corpus.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path.file_stem().ok_or_else(|| {
		LmError::io(
			input_path,
			std::io::Error::new(std::io::ErrorKind::InvalidInput, "Input path has no filename"),
		)
	})?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

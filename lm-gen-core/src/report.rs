//! Plain-text reports of a trained model.
//!
//! Both reports are sorted case-insensitively so they can be diffed
//! between runs.

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::io::write_lines;
use crate::model::counts::CountTable;
use crate::model::vocabulary::Vocabulary;

/// Writes the vocabulary, one word per line.
pub fn write_vocabulary<P: AsRef<Path>>(path: P, vocabulary: &Vocabulary) -> Result<()> {
	write_lines(&path, vocabulary.iter())?;
	info!("Wrote {} words to {}", vocabulary.len(), path.as_ref().display());
	Ok(())
}

/// Writes one `<ngram>\t<count>` line per counted n-gram.
pub fn write_counts<P: AsRef<Path>>(path: P, counts: &CountTable) -> Result<()> {
	let rows = counts.sorted_ngrams();
	write_lines(&path, rows.iter().map(|(ngram, count)| format!("{ngram}\t{count}")))?;
	info!("Wrote {} n-gram counts to {}", rows.len(), path.as_ref().display());
	Ok(())
}

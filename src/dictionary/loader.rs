//! Dictionary loading utilities
//!
//! Two formats are understood:
//! - JSON objects mapping each word to `{ "primary": ..., "secondary": ... }`
//! - Plain word lists, one word per line (glosses left empty)

use super::{Dictionary, Gloss};
use crate::core::Word;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a dictionary
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dictionary contains no valid words")]
    Empty,
}

/// Parse a JSON dictionary
///
/// Keys that are not valid words are skipped with a warning.
///
/// # Errors
/// Returns an error if the text is not a JSON object of glosses, or if no
/// key is a valid word.
///
/// # Examples
/// ```
/// use wordle_rooms::dictionary::loader::from_json_str;
///
/// let dictionary = from_json_str(r#"{"speed": {"primary": "速度", "secondary": "rate"}}"#).unwrap();
/// assert!(dictionary.contains("speed"));
/// ```
pub fn from_json_str(json: &str) -> Result<Dictionary, DictionaryError> {
    let raw: BTreeMap<String, Gloss> = serde_json::from_str(json)?;

    let entries = raw.into_iter().filter_map(|(key, gloss)| match Word::new(&key) {
        Ok(word) => Some((word, gloss)),
        Err(e) => {
            tracing::warn!("Skipping dictionary entry {key:?}: {e}");
            None
        }
    });

    non_empty(Dictionary::from_entries(entries))
}

/// Parse a plain word list
///
/// Blank lines are ignored and invalid words are skipped.
///
/// # Errors
/// Returns `DictionaryError::Empty` if no line holds a valid word.
pub fn from_word_list(content: &str) -> Result<Dictionary, DictionaryError> {
    let words = content.lines().filter_map(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        match Word::new(trimmed) {
            Ok(word) => Some(word),
            Err(e) => {
                tracing::warn!("Skipping word list line {trimmed:?}: {e}");
                None
            }
        }
    });

    non_empty(Dictionary::from_words(words))
}

/// Load a dictionary from a file
///
/// Files ending in `.json` are parsed as JSON, anything else as a word list.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or holds no
/// valid words.
///
/// # Examples
/// ```no_run
/// use wordle_rooms::dictionary::loader::load_from_file;
///
/// let dictionary = load_from_file("data/dictionary.json").unwrap();
/// println!("Loaded {} words", dictionary.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Dictionary, DictionaryError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let dictionary = if is_json {
        from_json_str(&content)?
    } else {
        from_word_list(&content)?
    };

    tracing::info!(
        "Loaded {} dictionary words from {}",
        dictionary.len(),
        path.display()
    );
    Ok(dictionary)
}

fn non_empty(dictionary: Dictionary) -> Result<Dictionary, DictionaryError> {
    if dictionary.is_empty() {
        Err(DictionaryError::Empty)
    } else {
        Ok(dictionary)
    }
}

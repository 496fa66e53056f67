//! Word dictionary
//!
//! Read-only mapping from word to its glosses. Built once at startup and
//! shared by every game through an `Arc`.

mod embedded;
pub mod loader;

pub use embedded::EMBEDDED_DICTIONARY;
pub use loader::DictionaryError;

use crate::core::Word;
use rand::Rng;
use rand::prelude::IndexedRandom;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Translations attached to a dictionary word
///
/// Both texts are opaque to the engine and only passed through to messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gloss {
    #[serde(default)]
    pub primary: String,
    #[serde(default)]
    pub secondary: String,
}

impl Gloss {
    #[must_use]
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// Immutable word → gloss lookup with a per-length index
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: FxHashMap<Word, Gloss>,
    by_length: FxHashMap<usize, Vec<Word>>,
}

impl Dictionary {
    /// Build a dictionary from entries; the first occurrence of a word wins
    pub fn from_entries(entries: impl IntoIterator<Item = (Word, Gloss)>) -> Self {
        let mut dictionary = Self::default();

        for (word, gloss) in entries {
            if dictionary.entries.contains_key(&word) {
                continue;
            }
            dictionary
                .by_length
                .entry(word.len())
                .or_default()
                .push(word.clone());
            dictionary.entries.insert(word, gloss);
        }

        dictionary
    }

    /// Build a dictionary of bare words with empty glosses
    pub fn from_words(words: impl IntoIterator<Item = Word>) -> Self {
        Self::from_entries(words.into_iter().map(|word| (word, Gloss::default())))
    }

    /// The dictionary compiled into the binary
    ///
    /// # Errors
    /// Returns an error if the embedded JSON does not parse.
    pub fn embedded() -> Result<Self, DictionaryError> {
        loader::from_json_str(EMBEDDED_DICTIONARY)
    }

    /// Membership test (case-insensitive)
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word.to_ascii_lowercase().as_str())
    }

    /// Glosses for a word, if it is in the dictionary
    #[must_use]
    pub fn metadata_of(&self, word: &str) -> Option<&Gloss> {
        self.entries.get(word.to_ascii_lowercase().as_str())
    }

    /// All words with exactly `length` letters, in load order
    #[must_use]
    pub fn words_of_length(&self, length: usize) -> &[Word] {
        self.by_length.get(&length).map_or(&[], Vec::as_slice)
    }

    /// Pick a word of the given length uniformly at random
    ///
    /// Returns `None` when no word has that length.
    pub fn random_word<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Option<&Word> {
        self.words_of_length(length).choose(rng)
    }

    /// Distinct word lengths present, ascending
    #[must_use]
    pub fn lengths(&self) -> Vec<usize> {
        let mut lengths: Vec<usize> = self.by_length.keys().copied().collect();
        lengths.sort_unstable();
        lengths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

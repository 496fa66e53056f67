//! One-shot scoring command
//!
//! Scores a single guess against a target without starting a game.

use crate::core::{Feedback, Word, WordError, score};
use crate::output::{feedback_to_emoji, feedback_to_letters};
use colored::Colorize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("invalid word '{word}': {source}")]
    InvalidWord {
        word: String,
        #[source]
        source: WordError,
    },
    #[error("'{guess}' has {} letters but '{target}' has {}", .guess.len(), .target.len())]
    LengthMismatch { target: Word, guess: Word },
}

fn parse(word: &str) -> Result<Word, ScoreError> {
    Word::new(word).map_err(|source| ScoreError::InvalidWord {
        word: word.to_string(),
        source,
    })
}

/// Score `guess` against `target`
///
/// # Errors
///
/// Returns an error if either word is invalid or the lengths differ.
pub fn score_words(target: &str, guess: &str) -> Result<Feedback, ScoreError> {
    let target = parse(target)?;
    let guess = parse(guess)?;
    if target.len() != guess.len() {
        return Err(ScoreError::LengthMismatch { target, guess });
    }
    Ok(score(&target, &guess))
}

/// Print a scored guess
pub fn print_score(guess: &str, feedback: &Feedback) {
    println!(
        "{}  {}  {}",
        guess.to_uppercase().bright_white().bold(),
        feedback_to_emoji(feedback),
        feedback_to_letters(feedback)
    );
    if feedback.is_perfect() {
        println!("{}", "✅ Exact match".green().bold());
    }
}

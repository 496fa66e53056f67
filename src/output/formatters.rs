//! Formatting utilities for terminal output

use crate::core::{Classification, Feedback};

/// Emoji square for one classification
#[must_use]
pub const fn classification_emoji(classification: Classification) -> char {
    match classification {
        Classification::Correct => '🟩',
        Classification::Misplaced => '🟨',
        Classification::Wrong => '⬜',
    }
}

/// Format feedback as a row of emoji squares, e.g. `🟨⬜⬜🟨🟨`
#[must_use]
pub fn feedback_to_emoji(feedback: &Feedback) -> String {
    feedback
        .iter()
        .map(|item| classification_emoji(item.classification))
        .collect()
}

/// Format feedback as the guessed letters, uppercase for exact matches,
/// lowercase for misplaced and `·` for letters not in the word
#[must_use]
pub fn feedback_to_letters(feedback: &Feedback) -> String {
    feedback
        .iter()
        .map(|item| match item.classification {
            Classification::Correct => item.character.to_ascii_uppercase(),
            Classification::Misplaced => item.character.to_ascii_lowercase(),
            Classification::Wrong => '·',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Word, score};

    fn feedback(target: &str, guess: &str) -> Feedback {
        score(&Word::new(target).unwrap(), &Word::new(guess).unwrap())
    }

    #[test]
    fn emoji_for_duplicates() {
        assert_eq!(feedback_to_emoji(&feedback("speed", "erase")), "🟨⬜⬜🟨🟨");
    }

    #[test]
    fn emoji_all_green() {
        assert_eq!(feedback_to_emoji(&feedback("cat", "cat")), "🟩🟩🟩");
    }

    #[test]
    fn letters_mark_each_class() {
        assert_eq!(feedback_to_letters(&feedback("floor", "robot")), "ro·O·");
    }
}

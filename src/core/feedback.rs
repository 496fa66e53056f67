//! Guess scoring and per-letter feedback
//!
//! Each letter of a guess is classified as:
//! - Correct (right letter, right position)
//! - Misplaced (letter occurs elsewhere in the target, within its remaining count)
//! - Wrong (no unconsumed occurrence left in the target)

use super::Word;
use std::fmt;

/// Feedback for a single letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Correct,
    Misplaced,
    Wrong,
}

impl Classification {
    /// Single-character symbol: `G` correct, `Y` misplaced, `-` wrong
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Correct => 'G',
            Self::Misplaced => 'Y',
            Self::Wrong => '-',
        }
    }
}

/// One scored letter of a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultItem {
    pub character: char,
    pub classification: Classification,
}

impl ResultItem {
    #[must_use]
    pub const fn new(character: char, classification: Classification) -> Self {
        Self {
            character,
            classification,
        }
    }
}

/// Scored guess, one item per letter in guess order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback(Vec<ResultItem>);

impl Feedback {
    #[must_use]
    pub fn items(&self) -> &[ResultItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultItem> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every letter is correct
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.0
            .iter()
            .all(|item| item.classification == Classification::Correct)
    }

    /// Count letters with the given classification
    #[must_use]
    pub fn count(&self, classification: Classification) -> usize {
        self.0
            .iter()
            .filter(|item| item.classification == classification)
            .count()
    }

    /// Classification symbols as a string, e.g. `"Y--YY"`
    #[must_use]
    pub fn pattern(&self) -> String {
        self.0.iter().map(|item| item.classification.symbol()).collect()
    }
}

impl<'a> IntoIterator for &'a Feedback {
    type Item = &'a ResultItem;
    type IntoIter = std::slice::Iter<'a, ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern())
    }
}

/// Score `guess` against `target`
///
/// # Algorithm
/// 1. First pass: every exact positional match is Correct and consumes that
///    target position
/// 2. Second pass: every other guess letter consumes the earliest unconsumed
///    occurrence of the same letter in the target (Misplaced), or is Wrong
///    when none remains
///
/// Consuming target positions keeps repeated letters from being counted
/// more often than they occur in the target.
///
/// # Panics
/// Panics if the words differ in length. Callers validate lengths before
/// scoring.
///
/// # Examples
/// ```
/// use wordle_rooms::core::{score, Word};
///
/// let target = Word::new("floor").unwrap();
/// let guess = Word::new("robot").unwrap();
/// assert_eq!(score(&target, &guess).pattern(), "YY-G-");
/// ```
#[must_use]
pub fn score(target: &Word, guess: &Word) -> Feedback {
    assert_eq!(
        target.len(),
        guess.len(),
        "cannot score a {}-letter guess against a {}-letter target",
        guess.len(),
        target.len()
    );

    let guess_chars = guess.chars();

    if target == guess {
        return Feedback(
            guess_chars
                .iter()
                .map(|&ch| ResultItem::new(char::from(ch), Classification::Correct))
                .collect(),
        );
    }

    let target_chars = target.chars();
    let mut consumed = vec![false; target_chars.len()];
    let mut classes = vec![Classification::Wrong; guess_chars.len()];

    for (i, (&t, &g)) in target_chars.iter().zip(guess_chars).enumerate() {
        if t == g {
            consumed[i] = true;
            classes[i] = Classification::Correct;
        }
    }

    for (i, &g) in guess_chars.iter().enumerate() {
        if classes[i] == Classification::Correct {
            continue;
        }

        let available = target_chars
            .iter()
            .zip(&consumed)
            .position(|(&t, &used)| !used && t == g);

        if let Some(j) = available {
            consumed[j] = true;
            classes[i] = Classification::Misplaced;
        }
    }

    Feedback(
        guess_chars
            .iter()
            .zip(classes)
            .map(|(&ch, class)| ResultItem::new(char::from(ch), class))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn scored(target: &str, guess: &str) -> Feedback {
        score(&Word::new(target).unwrap(), &Word::new(guess).unwrap())
    }

    #[test]
    fn all_wrong() {
        let feedback = scored("fghij", "abcde");
        assert_eq!(feedback.pattern(), "-----");
        assert_eq!(feedback.count(Classification::Wrong), 5);
    }

    #[test]
    fn exact_guess_is_all_correct() {
        let feedback = scored("crane", "crane");
        assert!(feedback.is_perfect());
        assert_eq!(feedback.count(Classification::Correct), 5);
        assert_eq!(feedback.len(), 5);
    }

    #[test]
    fn items_keep_guess_letters_in_order() {
        let feedback = scored("slate", "crane");
        let letters: String = feedback.iter().map(|item| item.character).collect();
        assert_eq!(letters, "crane");
        assert_eq!(feedback.pattern(), "--G-G");
    }

    #[test]
    fn duplicate_letters_speed_erase() {
        // Target SPEED holds two E's. Guess ERASE spends one on position 0 and
        // the other on position 4; S is present at target position 0.
        let feedback = scored("speed", "erase");
        assert_eq!(
            feedback.items(),
            &[
                ResultItem::new('e', Classification::Misplaced),
                ResultItem::new('r', Classification::Wrong),
                ResultItem::new('a', Classification::Wrong),
                ResultItem::new('s', Classification::Misplaced),
                ResultItem::new('e', Classification::Misplaced),
            ]
        );
    }

    #[test]
    fn duplicate_letters_green_takes_priority() {
        // ROBOT vs FLOOR: second O is exact, first O takes the remaining one
        let feedback = scored("floor", "robot");
        assert_eq!(feedback.pattern(), "YY-G-");
    }

    #[test]
    fn duplicate_guess_letters_exceeding_target_count() {
        // Only one E in the target; the exact match uses it up
        let feedback = scored("crane", "geese");
        assert_eq!(feedback.pattern(), "----G");

        // Only one L; the exact match claims it
        let feedback = scored("lemon", "lolls");
        assert_eq!(feedback.pattern(), "GY---");
    }

    #[test]
    fn misplaced_uses_occurrences_left_after_exact_matches() {
        let feedback = scored("abbey", "kebab");
        assert_eq!(feedback.pattern(), "-YGYY");
    }

    #[test]
    fn works_for_other_lengths() {
        assert_eq!(scored("cat", "act").pattern(), "YYG");
        assert_eq!(scored("a", "b").pattern(), "-");
        assert_eq!(scored("abandoned", "abandoned").pattern(), "GGGGGGGGG");
    }

    #[test]
    #[should_panic(expected = "cannot score")]
    fn mismatched_lengths_panic() {
        let _ = scored("speed", "sped");
    }

    #[test]
    fn display_uses_symbols() {
        assert_eq!(Classification::Correct.symbol(), 'G');
        assert_eq!(Classification::Misplaced.symbol(), 'Y');
        assert_eq!(Classification::Wrong.symbol(), '-');
        assert_eq!(scored("speed", "erase").to_string(), "Y--YY");
    }

    #[test]
    fn scoring_invariants_hold_for_word_pairs() {
        let words = [
            "speed", "erase", "floor", "robot", "geese", "eerie", "level", "llama", "abbey",
            "kebab", "crane", "slate", "sassy", "asses", "mamma",
        ];

        for target in words {
            for guess in words {
                let feedback = scored(target, guess);

                let exact = target
                    .bytes()
                    .zip(guess.bytes())
                    .filter(|(t, g)| t == g)
                    .count();
                assert_eq!(
                    feedback.count(Classification::Correct),
                    exact,
                    "{target} / {guess}"
                );

                let mut target_counts: FxHashMap<char, usize> = FxHashMap::default();
                for ch in target.chars() {
                    *target_counts.entry(ch).or_default() += 1;
                }
                let mut hits: FxHashMap<char, usize> = FxHashMap::default();
                for item in &feedback {
                    if item.classification != Classification::Wrong {
                        *hits.entry(item.character).or_default() += 1;
                    }
                }
                for (ch, count) in hits {
                    assert!(
                        count <= target_counts.get(&ch).copied().unwrap_or(0),
                        "{target} / {guess}: letter {ch} over-counted"
                    );
                }

                assert_eq!(feedback.is_perfect(), target == guess);
            }
        }
    }
}

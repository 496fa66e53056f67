//! Game board rendering

use crate::core::{Classification, ResultItem};
use crate::engine::SessionView;
use colored::{ColoredString, Colorize};

fn tile(item: &ResultItem) -> ColoredString {
    let letter = format!(" {} ", item.character.to_ascii_uppercase());
    match item.classification {
        Classification::Correct => letter.black().on_green().bold(),
        Classification::Misplaced => letter.black().on_yellow().bold(),
        Classification::Wrong => letter.white().on_bright_black(),
    }
}

fn empty_tile() -> ColoredString {
    " _ ".dimmed()
}

/// Render a session as a grid of `attempt_limit` rows, `target_len` tiles each
///
/// Rows not yet played are drawn as blanks. Tiles are separated by one space
/// and rows by a newline; the result has no trailing newline.
#[must_use]
pub fn render_board(view: &SessionView) -> String {
    let played = view.history.iter().map(|feedback| {
        feedback
            .iter()
            .map(|item| tile(item).to_string())
            .collect::<Vec<_>>()
            .join(" ")
    });

    let blank = vec![empty_tile().to_string(); view.target_len].join(" ");
    let remaining = view.attempt_limit.saturating_sub(view.history.len());

    played
        .chain(std::iter::repeat_n(blank, remaining))
        .collect::<Vec<_>>()
        .join("\n")
}

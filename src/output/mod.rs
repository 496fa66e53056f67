//! Terminal output formatting
//!
//! Board rendering and compact feedback strings for the CLI.

pub mod board;
pub mod formatters;

pub use board::render_board;
pub use formatters::{feedback_to_emoji, feedback_to_letters};

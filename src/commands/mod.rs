//! Command implementations

pub mod play;
pub mod score;

pub use play::{ConsoleNotifier, Input, LOCAL_CHANNEL, respond, run_play};
pub use score::{ScoreError, print_score, score_words};

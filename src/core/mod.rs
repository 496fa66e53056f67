//! Core domain types
//!
//! Words and the scoring algorithm. Everything here is pure and synchronous;
//! the engine layers sessions, timers and channels on top.

mod feedback;
mod word;

pub use feedback::{Classification, Feedback, ResultItem, score};
pub use word::{Word, WordError};

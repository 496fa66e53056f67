//! Embedded dictionary
//!
//! Compiled into the binary so the engine runs without any data files.

/// Default dictionary as JSON: `word -> { "primary": ..., "secondary": ... }`
pub const EMBEDDED_DICTIONARY: &str = include_str!("../../data/dictionary.json");

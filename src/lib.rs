//! Wordle Rooms
//!
//! A multi-channel Wordle game engine: at most one game per channel, words of
//! any length, duplicate-aware scoring and an inactivity timeout per game.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wordle_rooms::config::EngineConfig;
//! use wordle_rooms::dictionary::Dictionary;
//! use wordle_rooms::engine::{ChannelId, GameRegistry, LogNotifier, TokioScheduler};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let registry = GameRegistry::new(
//!     Arc::new(Dictionary::embedded()?),
//!     Arc::new(TokioScheduler::from_current()?),
//!     Arc::new(LogNotifier),
//!     EngineConfig::default(),
//! );
//!
//! let channel = ChannelId::from("general");
//! assert!(registry.start_game(&channel, 5));
//! let submission = registry.submit(&channel, "crane");
//! println!("{submission:?}");
//! # Ok(())
//! # }
//! ```

// Core domain types
pub mod core;

// Dictionary and word metadata
pub mod dictionary;

// Games, registry and timeouts
pub mod engine;

// Engine and CLI settings
pub mod config;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

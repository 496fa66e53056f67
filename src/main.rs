//! Wordle Rooms - CLI
//!
//! Play per-channel Wordle games in the terminal, or score a single guess.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use wordle_rooms::{
    commands::{ConsoleNotifier, print_score, run_play, score_words},
    config::{EngineConfig, LengthPolicy},
    dictionary::{Dictionary, loader::load_from_file},
    engine::{GameRegistry, TokioScheduler},
};

#[derive(Parser)]
#[command(
    name = "wordle_rooms",
    about = "Per-channel Wordle games with duplicate-aware scoring and inactivity expiry",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Dictionary file: JSON object of word -> gloss, or one word per line
    #[arg(short, long, global = true)]
    dictionary: Option<PathBuf>,

    /// Seconds without a guess before a game expires
    #[arg(short, long, global = true, default_value = "600")]
    timeout: u64,

    /// Word length used when /start has no argument (clamped to 3-9)
    #[arg(short, long, global = true, default_value = "5")]
    length: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive game in the terminal (default)
    Play,

    /// Score a guess against a target word
    Score {
        /// The hidden word
        target: String,

        /// The guessed word
        guess: String,
    },
}

fn load_dictionary(path: Option<&PathBuf>) -> Result<Dictionary> {
    match path {
        Some(path) => load_from_file(path)
            .with_context(|| format!("failed to load dictionary from {}", path.display())),
        None => Dictionary::embedded().context("embedded dictionary is invalid"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut cli = Cli::parse();

    // Default to Play mode if no command given
    match cli.command.take().unwrap_or(Commands::Play) {
        Commands::Play => run_play_command(&cli).await,
        Commands::Score { target, guess } => {
            let feedback = score_words(&target, &guess)?;
            print_score(&guess, &feedback);
            Ok(())
        }
    }
}

async fn run_play_command(cli: &Cli) -> Result<()> {
    let dictionary = load_dictionary(cli.dictionary.as_ref())?;
    tracing::info!("Dictionary ready with {} words", dictionary.len());

    let defaults = LengthPolicy::default();
    let policy = LengthPolicy::new(
        cli.length.clamp(defaults.min, defaults.max),
        defaults.min,
        defaults.max,
    );

    let registry = GameRegistry::new(
        Arc::new(dictionary),
        Arc::new(TokioScheduler::from_current()?),
        Arc::new(ConsoleNotifier),
        EngineConfig::new(Duration::from_secs(cli.timeout)),
    );

    run_play(registry, policy).await?;
    Ok(())
}

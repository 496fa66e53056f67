//! Interactive play mode
//!
//! Reads lines from stdin and treats them as messages in a single local
//! channel. Lines starting with `/` are commands, anything else is a guess.

use crate::config::LengthPolicy;
use crate::engine::{
    ChannelId, ExpiryNotice, GameRegistry, Notifier, NotifyError, Reveal, Submission,
};
use crate::output::render_board;
use colored::Colorize;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Channel used for the terminal session
pub const LOCAL_CHANNEL: &str = "local";

/// One parsed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// `/start [length]`
    Start(Option<&'a str>),
    /// `/stop`
    Stop,
    /// `/board`
    Board,
    /// `/help`
    Help,
    /// `/quit`
    Quit,
    /// Unknown slash command
    Unknown(&'a str),
    /// Anything else, submitted as a guess
    Text(&'a str),
}

impl<'a> Input<'a> {
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Self::Text(line);
        };

        let mut parts = command.split_whitespace();
        match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("start" | "wordle") => Self::Start(parts.next()),
            Some("stop" | "end") => Self::Stop,
            Some("board") => Self::Board,
            Some("help" | "h") => Self::Help,
            Some("quit" | "q" | "exit") => Self::Quit,
            _ => Self::Unknown(line),
        }
    }
}

/// Prints expiry notices to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &ExpiryNotice) -> Result<(), NotifyError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "\n⏰ {}", notice.to_string().bright_red())
            .and_then(|()| stdout.flush())
            .map_err(|e| NotifyError::new(e.to_string()))
    }
}

fn answer(reveal: &Reveal) -> String {
    reveal.to_string().to_uppercase().bright_yellow().bold().to_string()
}

fn help_text() -> String {
    [
        "Commands:",
        "  /start [length]  start a game (default length if omitted)",
        "  /stop            give up and reveal the word",
        "  /board           show the current board",
        "  /quit            leave",
        "Anything else is taken as a guess.",
    ]
    .join("\n")
}

/// Apply one input line to the channel's game
///
/// Returns the reply to show, or `None` when the line is silently ignored.
#[must_use]
pub fn respond(
    registry: &GameRegistry,
    channel: &ChannelId,
    policy: &LengthPolicy,
    input: Input<'_>,
) -> Option<String> {
    match input {
        Input::Start(arg) => {
            let length = policy.resolve(arg);
            if registry.start_game(channel, length) {
                let session = registry.get_session(channel)?;
                Some(format!(
                    "Started a {length}-letter game. You have {} attempts.\n{}",
                    length + 1,
                    render_board(&session.view())
                ))
            } else if registry.get_session(channel).is_some() {
                Some("A game is already running in this channel.".to_string())
            } else {
                Some(format!("No {length}-letter words in the dictionary."))
            }
        }
        Input::Stop => {
            let Some(session) = registry.get_session(channel) else {
                return Some("No game is running.".to_string());
            };
            registry.finish_game(channel);
            Some(format!("Game stopped. The answer was: {}", answer(&session.reveal())))
        }
        Input::Board => Some(registry.get_session(channel).map_or_else(
            || "No game is running.".to_string(),
            |session| render_board(&session.view()),
        )),
        Input::Help => Some(help_text()),
        Input::Quit => None,
        Input::Unknown(command) => Some(format!("Unknown command '{command}'. Try /help.")),
        Input::Text(text) => match registry.submit(channel, text) {
            Submission::NoGame => Some("No game is running. Type /start to begin.".to_string()),
            Submission::Ignored => None,
            Submission::UnknownWord(word) => {
                Some(format!("'{word}' is not in the dictionary."))
            }
            Submission::Repeated(word) => Some(format!("'{word}' was already guessed.")),
            Submission::Scored {
                result,
                view,
                reveal,
            } => {
                let board = render_board(&view);
                let Some(reveal) = reveal else {
                    return Some(board);
                };
                let verdict = if result.win {
                    let rounds = view.rounds();
                    format!(
                        "🎉 Solved in {rounds} {}! The answer was: {}",
                        if rounds == 1 { "guess" } else { "guesses" },
                        answer(&reveal)
                    )
                    .green()
                    .bold()
                    .to_string()
                } else {
                    format!("Out of attempts. The answer was: {}", answer(&reveal))
                };
                Some(format!("{board}\n{verdict}"))
            }
        },
    }
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "> ")?;
    stdout.flush()
}

/// Run the interactive loop until `/quit` or end of input
///
/// # Errors
///
/// Returns an error if reading stdin or writing stdout fails.
pub async fn run_play(registry: GameRegistry, policy: LengthPolicy) -> io::Result<()> {
    let channel = ChannelId::from(LOCAL_CHANNEL);

    println!("\n{}", "═".repeat(60).cyan());
    println!("{}", "  W O R D L E   R O O M S".bright_green().bold());
    println!("{}", "═".repeat(60).cyan());
    println!(
        "Dictionary: {} words. Type /start to play, /help for commands.\n",
        registry.dictionary().len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = Input::parse(&line);
        if input == Input::Quit {
            break;
        }
        if let Some(reply) = respond(&registry, &channel, &policy, input) {
            println!("{reply}");
        }
    }

    registry.finish_all();
    println!("\n👋 Thanks for playing!\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::core::Word;
    use crate::dictionary::Dictionary;
    use crate::engine::{LogNotifier, TokioScheduler};
    use std::sync::Arc;

    fn registry() -> GameRegistry {
        let words = ["cat", "dog", "cow", "speed"];
        GameRegistry::new(
            Arc::new(Dictionary::from_words(
                words.iter().map(|w| Word::new(*w).unwrap()),
            )),
            Arc::new(TokioScheduler::from_current().unwrap()),
            Arc::new(LogNotifier),
            EngineConfig::default(),
        )
    }

    #[test]
    fn parses_commands_and_text() {
        assert_eq!(Input::parse("/start"), Input::Start(None));
        assert_eq!(Input::parse("  /START 7 "), Input::Start(Some("7")));
        assert_eq!(Input::parse("/stop"), Input::Stop);
        assert_eq!(Input::parse("/q"), Input::Quit);
        assert_eq!(Input::parse("/dance"), Input::Unknown("/dance"));
        assert_eq!(Input::parse(" crane "), Input::Text("crane"));
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_reports_running_game() {
        let registry = registry();
        let channel = ChannelId::from(LOCAL_CHANNEL);
        let policy = LengthPolicy::default();

        let first = respond(&registry, &channel, &policy, Input::Start(Some("3"))).unwrap();
        assert!(first.starts_with("Started a 3-letter game. You have 4 attempts."));

        let second = respond(&registry, &channel, &policy, Input::Start(None)).unwrap();
        assert_eq!(second, "A game is already running in this channel.");
    }

    #[tokio::test(start_paused = true)]
    async fn start_without_words_of_length() {
        let registry = registry();
        let channel = ChannelId::from(LOCAL_CHANNEL);
        let reply = respond(
            &registry,
            &channel,
            &LengthPolicy::default(),
            Input::Start(Some("8")),
        )
        .unwrap();
        assert_eq!(reply, "No 8-letter words in the dictionary.");
    }

    #[tokio::test(start_paused = true)]
    async fn guesses_flow_through_submit() {
        let registry = registry();
        let channel = ChannelId::from(LOCAL_CHANNEL);
        let policy = LengthPolicy::default();

        assert_eq!(
            respond(&registry, &channel, &policy, Input::Text("cat")).as_deref(),
            Some("No game is running. Type /start to begin.")
        );

        assert!(respond(&registry, &channel, &policy, Input::Start(Some("5"))).is_some());
        assert_eq!(
            respond(&registry, &channel, &policy, Input::Text("zzzzz")).as_deref(),
            Some("'zzzzz' is not in the dictionary.")
        );
        assert!(respond(&registry, &channel, &policy, Input::Text("cat")).is_none());

        let reply = respond(&registry, &channel, &policy, Input::Text("speed")).unwrap();
        assert!(reply.contains("Solved in 1 guess!"));
        assert!(registry.get_session(&channel).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_reveals_and_clears() {
        let registry = registry();
        let channel = ChannelId::from(LOCAL_CHANNEL);
        let policy = LengthPolicy::default();

        assert_eq!(
            respond(&registry, &channel, &policy, Input::Stop).as_deref(),
            Some("No game is running.")
        );
        assert!(respond(&registry, &channel, &policy, Input::Start(Some("5"))).is_some());
        let reply = respond(&registry, &channel, &policy, Input::Stop).unwrap();
        assert!(reply.contains("SPEED"));
        assert!(registry.get_session(&channel).is_none());
    }
}

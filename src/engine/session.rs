//! Single game state machine
//!
//! A session starts `Active` and ends in exactly one terminal state:
//! `Won`, `Exhausted` (out of attempts), `Expired` (inactivity timeout) or
//! `Stopped` (explicitly finished).

use super::ChannelId;
use super::scheduler::Timeout;
use crate::core::{Feedback, Word, score};
use crate::dictionary::Gloss;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Unique id of a session within one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Won,
    Exhausted,
    Expired,
    Stopped,
}

impl SessionStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("game is no longer active ({0:?})")]
    Closed(SessionStatus),
    #[error("guess has {guess} letters but the word has {target}")]
    LengthMismatch { target: usize, guess: usize },
}

/// Outcome of one accepted guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessResult {
    /// The game ended with this guess (won or out of attempts)
    pub finished: bool,
    pub win: bool,
    pub items: Feedback,
}

/// Everything a board renderer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub channel: ChannelId,
    pub target_len: usize,
    pub attempt_limit: usize,
    pub history: Vec<Feedback>,
}

impl SessionView {
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.history.len()
    }
}

/// The answer and its glosses, shown when a game ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub target: Word,
    pub gloss: Option<Gloss>,
}

impl fmt::Display for Reveal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)?;
        if let Some(gloss) = self.gloss.as_ref().filter(|g| !g.primary.is_empty()) {
            write!(f, " ({})", gloss.primary)?;
        }
        Ok(())
    }
}

/// State of one game
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    channel: ChannelId,
    target: Word,
    gloss: Option<Gloss>,
    attempt_limit: usize,
    history: Vec<Feedback>,
    history_plain: Vec<Word>,
    status: SessionStatus,
    timeout: Timeout,
}

impl GameSession {
    /// Create an active session and arm its inactivity timer
    pub(crate) fn start(
        id: SessionId,
        channel: ChannelId,
        target: Word,
        gloss: Option<Gloss>,
        mut timeout: Timeout,
    ) -> Self {
        timeout.arm();
        Self {
            id,
            channel,
            attempt_limit: target.len() + 1,
            target,
            gloss,
            history: Vec::new(),
            history_plain: Vec::new(),
            status: SessionStatus::Active,
            timeout,
        }
    }

    /// Score a guess and record it
    ///
    /// Re-arms the inactivity timer while the game goes on; a guess that
    /// ends the game cancels it instead. Repeats are not rejected here, use
    /// [`GameSession::has_guessed`] first.
    ///
    /// # Errors
    /// - `SessionError::Closed` if the session is in a terminal state
    /// - `SessionError::LengthMismatch` if the guess length differs from the target
    pub fn guess(&mut self, word: &Word) -> Result<GuessResult, SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::Closed(self.status));
        }
        if word.len() != self.target.len() {
            return Err(SessionError::LengthMismatch {
                target: self.target.len(),
                guess: word.len(),
            });
        }

        self.history_plain.push(word.clone());
        let items = score(&self.target, word);
        let win = items.is_perfect();
        self.history.push(items.clone());

        if win {
            self.status = SessionStatus::Won;
        } else if self.rounds() == self.attempt_limit {
            self.status = SessionStatus::Exhausted;
        }

        let finished = self.status.is_terminal();
        if finished {
            self.timeout.disarm();
        } else {
            self.timeout.arm();
        }

        tracing::debug!(
            "Session {} in {}: guess {} scored {} ({}/{})",
            self.id,
            self.channel,
            word,
            items,
            self.rounds(),
            self.attempt_limit
        );

        Ok(GuessResult {
            finished,
            win,
            items,
        })
    }

    /// Whether this exact word was guessed before (case-insensitive)
    #[must_use]
    pub fn has_guessed(&self, word: &str) -> bool {
        self.history_plain
            .iter()
            .any(|guessed| guessed.text().eq_ignore_ascii_case(word))
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    #[must_use]
    pub fn target(&self) -> &Word {
        &self.target
    }

    #[must_use]
    pub fn attempt_limit(&self) -> usize {
        self.attempt_limit
    }

    #[must_use]
    pub fn rounds(&self) -> usize {
        self.history.len()
    }

    /// Out of attempts
    ///
    /// Also true when the final allowed guess wins; check `win` on the
    /// guess result to tell the two apart.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.rounds() >= self.attempt_limit
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn history(&self) -> &[Feedback] {
        &self.history
    }

    #[must_use]
    pub fn history_plain(&self) -> &[Word] {
        &self.history_plain
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            channel: self.channel.clone(),
            target_len: self.target.len(),
            attempt_limit: self.attempt_limit,
            history: self.history.clone(),
        }
    }

    #[must_use]
    pub fn reveal(&self) -> Reveal {
        Reveal {
            target: self.target.clone(),
            gloss: self.gloss.clone(),
        }
    }

    /// End the session from outside; keeps an earlier terminal status
    pub(crate) fn close(&mut self, status: SessionStatus) {
        self.timeout.disarm();
        if !self.status.is_terminal() {
            self.status = status;
        }
    }

    /// Commit an expiry fired at `epoch`
    ///
    /// Returns false when a guess or finish got there first.
    pub(crate) fn try_expire(&mut self, epoch: u64) -> bool {
        if self.status.is_terminal() || !self.timeout.is_current(epoch) {
            return false;
        }
        self.timeout.clear_fired();
        self.status = SessionStatus::Expired;
        true
    }

    #[cfg(test)]
    pub(crate) fn timer_armed(&self) -> bool {
        self.timeout.is_armed()
    }
}

/// Shared, lock-guarded session as handed out by the registry
///
/// All mutation goes through the inner mutex, so guesses, finishes and
/// expiry on one channel are serialized.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    channel: ChannelId,
    session: Mutex<GameSession>,
}

impl SessionHandle {
    pub(crate) fn new(session: GameSession) -> Self {
        Self {
            id: session.id(),
            channel: session.channel().clone(),
            session: Mutex::new(session),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    /// See [`GameSession::guess`]
    ///
    /// # Errors
    /// Same as [`GameSession::guess`].
    pub fn guess(&self, word: &Word) -> Result<GuessResult, SessionError> {
        self.lock().guess(word)
    }

    #[must_use]
    pub fn has_guessed(&self, word: &str) -> bool {
        self.lock().has_guessed(word)
    }

    #[must_use]
    pub fn target_len(&self) -> usize {
        self.lock().target().len()
    }

    #[must_use]
    pub fn rounds(&self) -> usize {
        self.lock().rounds()
    }

    #[must_use]
    pub fn failed(&self) -> bool {
        self.lock().failed()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.lock().status()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.lock().view()
    }

    #[must_use]
    pub fn reveal(&self) -> Reveal {
        self.lock().reveal()
    }

    /// Read access to the whole session
    pub fn with<R>(&self, f: impl FnOnce(&GameSession) -> R) -> R {
        f(&self.lock())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, GameSession> {
        // A panic mid-guess leaves history and history_plain possibly uneven,
        // but the session is still safe to close
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

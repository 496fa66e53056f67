//! Game engine
//!
//! One [`GameRegistry`] owns every running game, at most one per channel.
//! Games expire after a period without guesses through the [`Scheduler`],
//! and expiry is announced through the [`Notifier`].

mod notify;
mod registry;
mod scheduler;
mod session;

pub use notify::{ExpiryNotice, LogNotifier, Notifier, NotifyError};
pub use registry::{GameRegistry, Submission};
pub use scheduler::{Scheduler, SchedulerError, TimerHandle, TimerTask, TokioScheduler};
pub use session::{
    GameSession, GuessResult, Reveal, SessionError, SessionHandle, SessionId, SessionStatus,
    SessionView,
};

use std::borrow::Borrow;
use std::fmt;

/// Identifier of the conversation a game belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ChannelId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

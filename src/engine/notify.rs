//! Outbound notifications for games that expire
//!
//! The engine itself never talks to a chat platform. When an inactive game
//! times out it hands an [`ExpiryNotice`] to a [`Notifier`] and moves on.

use super::{ChannelId, Reveal};
use std::fmt;
use thiserror::Error;

/// Message sent when a game expires without a winner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryNotice {
    pub channel: ChannelId,
    pub reveal: Reveal,
}

impl fmt::Display for ExpiryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time's up, nobody guessed the word. The answer was: {}",
            self.reveal
        )
    }
}

/// A notification that could not be delivered
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(String);

impl NotifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Fire-and-forget delivery of expiry notices
///
/// Failures are logged by the engine; game state is already committed by the
/// time `notify` runs.
pub trait Notifier: Send + Sync {
    /// Deliver a notice
    ///
    /// # Errors
    /// Returns `NotifyError` if delivery failed.
    fn notify(&self, notice: &ExpiryNotice) -> Result<(), NotifyError>;
}

impl<F> Notifier for F
where
    F: Fn(&ExpiryNotice) -> Result<(), NotifyError> + Send + Sync,
{
    fn notify(&self, notice: &ExpiryNotice) -> Result<(), NotifyError> {
        self(notice)
    }
}

/// Notifier that only writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &ExpiryNotice) -> Result<(), NotifyError> {
        tracing::info!("[{}] {notice}", notice.channel);
        Ok(())
    }
}

//! Channel → game registry
//!
//! The registry is the single source of truth for whether a channel has a
//! game. Lock order is always channel shard first, then the session mutex.

use super::notify::{ExpiryNotice, Notifier};
use super::scheduler::{ExpiryCallback, Scheduler, Timeout};
use super::session::{
    GameSession, GuessResult, Reveal, SessionError, SessionHandle, SessionId, SessionStatus,
    SessionView,
};
use super::ChannelId;
use crate::config::EngineConfig;
use crate::core::Word;
use crate::dictionary::Dictionary;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// What happened to a raw chat message sent to a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The channel has no running game
    NoGame,
    /// Wrong length or not a plain word; silently dropped
    Ignored,
    /// Right shape but not in the dictionary
    UnknownWord(Word),
    /// Already guessed in this game
    Repeated(Word),
    /// Guess accepted and scored
    Scored {
        result: GuessResult,
        view: SessionView,
        /// Answer, present when this guess ended the game
        reveal: Option<Reveal>,
    },
}

/// Registry of running games, one per channel
///
/// Cheap to clone; clones share the same games.
#[derive(Clone)]
pub struct GameRegistry {
    inner: Arc<Inner>,
}

struct Inner {
    dictionary: Arc<Dictionary>,
    scheduler: Arc<dyn Scheduler>,
    notifier: Arc<dyn Notifier>,
    config: EngineConfig,
    sessions: DashMap<ChannelId, Arc<SessionHandle>, FxBuildHasher>,
    next_id: AtomicU64,
}

impl GameRegistry {
    #[must_use]
    pub fn new(
        dictionary: Arc<Dictionary>,
        scheduler: Arc<dyn Scheduler>,
        notifier: Arc<dyn Notifier>,
        config: EngineConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                dictionary,
                scheduler,
                notifier,
                config,
                sessions: DashMap::default(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.inner.dictionary
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Start a game with a random word of `length` letters
    ///
    /// Returns false if the channel already has an active game, or if the
    /// dictionary has no word of that length. A game that already ended but
    /// was not yet cleaned up is replaced.
    #[must_use]
    pub fn start_game(&self, channel: &ChannelId, length: usize) -> bool {
        if length == 0 {
            return false;
        }

        match self.inner.sessions.entry(channel.clone()) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().status().is_terminal() {
                    tracing::debug!("Channel {channel} already has a game");
                    return false;
                }
                let Some(handle) = self.create_session(channel, length) else {
                    return false;
                };
                let previous = occupied.insert(handle);
                previous.lock().close(SessionStatus::Stopped);
            }
            Entry::Vacant(vacant) => {
                let Some(handle) = self.create_session(channel, length) else {
                    return false;
                };
                vacant.insert(handle);
            }
        }

        true
    }

    /// Look up the channel's game
    ///
    /// A game that ran out of attempts counts as absent and is removed here.
    #[must_use]
    pub fn get_session(&self, channel: &ChannelId) -> Option<Arc<SessionHandle>> {
        if let Some((_, stale)) = self
            .inner
            .sessions
            .remove_if(channel, |_, handle| handle.failed())
        {
            stale.lock().close(SessionStatus::Stopped);
            tracing::debug!("Removed exhausted game {} in {channel}", stale.id());
            return None;
        }

        self.inner
            .sessions
            .get(channel)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// End the channel's game, if any, and cancel its timeout
    pub fn finish_game(&self, channel: &ChannelId) {
        if let Some((_, handle)) = self.inner.sessions.remove(channel) {
            Self::close(&handle);
        }
    }

    /// Membership test against the dictionary
    #[must_use]
    pub fn check_word(&self, word: &str) -> bool {
        self.inner.dictionary.contains(word)
    }

    /// Guess on the channel's game
    ///
    /// Returns `None` if there is no live game, or the guess length does not
    /// match the word. Dictionary and repeat checks are the caller's job;
    /// see [`GameRegistry::submit`] for the full pipeline.
    pub fn guess(&self, channel: &ChannelId, word: &Word) -> Option<GuessResult> {
        let handle = self.get_session(channel)?;
        match handle.guess(word) {
            Ok(result) => Some(result),
            Err(e @ SessionError::LengthMismatch { .. }) => {
                tracing::debug!("Ignoring guess in {channel}: {e}");
                None
            }
            Err(SessionError::Closed(_)) => None,
        }
    }

    /// Handle a raw chat message as a guess
    ///
    /// Uses the first whitespace-separated token. Malformed, unknown and
    /// repeated words never consume an attempt. A guess that ends the game
    /// removes it right away.
    pub fn submit(&self, channel: &ChannelId, text: &str) -> Submission {
        let Some(handle) = self.get_session(channel) else {
            return Submission::NoGame;
        };

        let Some(token) = text.split_whitespace().next() else {
            return Submission::Ignored;
        };
        if token.len() != handle.target_len() || !token.bytes().all(|b| b.is_ascii_alphabetic())
        {
            return Submission::Ignored;
        }
        let Ok(word) = Word::new(token) else {
            return Submission::Ignored;
        };
        if !self.check_word(word.text()) {
            return Submission::UnknownWord(word);
        }

        let submission = {
            let mut session = handle.lock();
            if session.has_guessed(word.text()) {
                return Submission::Repeated(word);
            }
            match session.guess(&word) {
                Ok(result) => Submission::Scored {
                    reveal: result.finished.then(|| session.reveal()),
                    view: session.view(),
                    result,
                },
                Err(_) => return Submission::NoGame,
            }
        };

        if let Submission::Scored { result, .. } = &submission
            && result.finished
        {
            self.finish_session(channel, handle.id());
            tracing::info!(
                "Game {} in {channel} finished: {}",
                handle.id(),
                if result.win { "won" } else { "out of attempts" }
            );
        }

        submission
    }

    /// Number of channels currently holding a game
    #[must_use]
    pub fn active_games(&self) -> usize {
        self.inner.sessions.len()
    }

    /// End every game; used at shutdown
    pub fn finish_all(&self) {
        let channels: Vec<ChannelId> = self
            .inner
            .sessions
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        for channel in &channels {
            self.finish_game(channel);
        }
    }

    fn finish_session(&self, channel: &ChannelId, id: SessionId) {
        if let Some((_, handle)) = self
            .inner
            .sessions
            .remove_if(channel, |_, handle| handle.id() == id)
        {
            Self::close(&handle);
        }
    }

    fn close(handle: &SessionHandle) {
        handle.lock().close(SessionStatus::Stopped);
        tracing::info!("Game {} in {} closed", handle.id(), handle.channel());
    }

    fn create_session(&self, channel: &ChannelId, length: usize) -> Option<Arc<SessionHandle>> {
        let dictionary = &self.inner.dictionary;
        let Some(target) = dictionary.random_word(length, &mut rand::rng()).cloned() else {
            tracing::warn!("No {length}-letter words available for {channel}");
            return None;
        };
        let gloss = dictionary.metadata_of(target.text()).cloned();
        let id = SessionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let expiring_channel = channel.clone();
        let on_expire: ExpiryCallback = Arc::new(move |epoch| {
            if let Some(inner) = weak.upgrade() {
                inner.expire(&expiring_channel, id, epoch);
            }
        });
        let timeout = Timeout::new(
            Arc::clone(&self.inner.scheduler),
            self.inner.config.inactivity_window,
            on_expire,
        );

        tracing::info!("Game {id} started in {channel} with a {length}-letter word");
        let session = GameSession::start(id, channel.clone(), target, gloss, timeout);
        Some(Arc::new(SessionHandle::new(session)))
    }
}

impl Inner {
    /// Timeout callback: remove the session if this firing is still current
    fn expire(&self, channel: &ChannelId, id: SessionId, epoch: u64) {
        let Some((_, handle)) = self.sessions.remove_if(channel, |_, handle| {
            handle.id() == id && handle.lock().try_expire(epoch)
        }) else {
            tracing::debug!("Stale timeout for game {id} in {channel} ignored");
            return;
        };

        let notice = ExpiryNotice {
            channel: channel.clone(),
            reveal: handle.reveal(),
        };
        tracing::info!("Game {id} in {channel} expired after inactivity");

        if let Err(e) = self.notifier.notify(&notice) {
            tracing::warn!("Could not announce expiry in {channel}: {e}");
        }
    }
}

impl std::fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameRegistry")
            .field("games", &self.inner.sessions.len())
            .field("dictionary_words", &self.inner.dictionary.len())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

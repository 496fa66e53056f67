//! Delayed-callback scheduling
//!
//! Sessions only see the [`Scheduler`] trait. [`TokioScheduler`] backs it with
//! one sleeping task per timer.

use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Callback run when a timer fires
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle identifying one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Schedules callbacks after a delay
///
/// Implementations must guarantee that after `cancel` returns, the task has
/// either already started running or will never run.
///
/// `schedule` must never run `task` on the calling thread before returning,
/// even for a zero delay. Callers arm timers while holding registry locks
/// that the task itself takes when it fires.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;

    /// Cancel a pending timer; no-op if it already fired or was canceled
    fn cancel(&self, handle: TimerHandle);
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no tokio runtime is running on this thread")]
    NoRuntime,
}

/// Scheduler spawning one tokio task per timer
///
/// Each task races its sleep against a cancel signal. Whoever removes the
/// timer from the pending table first decides the outcome, so firing and
/// canceling never both take effect.
pub struct TokioScheduler {
    runtime: Handle,
    next_id: AtomicU64,
    pending: Arc<DashMap<u64, watch::Sender<bool>, FxBuildHasher>>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(0),
            pending: Arc::new(DashMap::default()),
        }
    }

    /// Use the runtime of the calling context
    ///
    /// # Errors
    /// Returns `SchedulerError::NoRuntime` outside a tokio runtime.
    pub fn from_current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| SchedulerError::NoRuntime)
    }

    /// Number of timers that have neither fired nor been canceled
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        self.pending.insert(id, cancel_tx);

        let pending = Arc::clone(&self.pending);
        self.runtime.spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    if pending.remove(&id).is_some() {
                        task();
                    }
                }
                _ = cancel_rx.changed() => {}
            }
        });

        tracing::trace!("Scheduled timer {id} in {delay:?}");
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some((_, cancel_tx)) = self.pending.remove(&handle.0) {
            // Receiver may already be gone if the task was dropped with the runtime
            let _ = cancel_tx.send(true);
            tracing::trace!("Canceled timer {}", handle.0);
        }
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

/// Callback a session's timeout invokes with the epoch it was armed at
pub(crate) type ExpiryCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// A session's inactivity timer
///
/// Every re-arm bumps the epoch. A firing callback only counts if its epoch
/// is still current, which filters out timers that started running just as
/// they were canceled.
pub(crate) struct Timeout {
    scheduler: Arc<dyn Scheduler>,
    window: Duration,
    on_expire: ExpiryCallback,
    handle: Option<TimerHandle>,
    epoch: u64,
}

impl Timeout {
    pub(crate) fn new(
        scheduler: Arc<dyn Scheduler>,
        window: Duration,
        on_expire: ExpiryCallback,
    ) -> Self {
        Self {
            scheduler,
            window,
            on_expire,
            handle: None,
            epoch: 0,
        }
    }

    /// Cancel any pending timer and schedule a fresh one
    pub(crate) fn arm(&mut self) {
        self.disarm();
        self.epoch += 1;

        let epoch = self.epoch;
        let on_expire = Arc::clone(&self.on_expire);
        self.handle = Some(
            self.scheduler
                .schedule(self.window, Box::new(move || on_expire(epoch))),
        );
    }

    pub(crate) fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// True if a firing armed at `epoch` is the live timer
    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.handle.is_some() && self.epoch == epoch
    }

    /// Forget the handle of a timer that has fired
    pub(crate) fn clear_fired(&mut self) {
        self.handle = None;
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl fmt::Debug for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeout")
            .field("window", &self.window)
            .field("handle", &self.handle)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_task(counter: &Arc<AtomicUsize>) -> TimerTask {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let scheduler = TokioScheduler::from_current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler.schedule(Duration::from_secs(60), counter_task(&fired));
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_task_runs_after_schedule_returns() {
        let scheduler = TokioScheduler::from_current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler.schedule(Duration::ZERO, counter_task(&fired));
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn canceled_timer_never_fires() {
        let scheduler = TokioScheduler::from_current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let handle = scheduler.schedule(Duration::from_secs(60), counter_task(&fired));
        scheduler.cancel(handle);
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(Duration::from_secs(120)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Second cancel is a no-op
        scheduler.cancel(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_rearm_replaces_previous_timer() {
        let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::from_current().unwrap());
        let fired_epochs = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired_epochs);
        let on_expire: ExpiryCallback = Arc::new(move |epoch| sink.lock().unwrap().push(epoch));

        let mut timeout = Timeout::new(scheduler, Duration::from_secs(10), on_expire);
        timeout.arm();
        assert!(timeout.is_current(1));

        tokio::time::sleep(Duration::from_secs(5)).await;
        timeout.arm();
        assert!(!timeout.is_current(1));
        assert!(timeout.is_current(2));

        tokio::time::sleep(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;
        assert!(fired_epochs.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert_eq!(*fired_epochs.lock().unwrap(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_timeout_is_not_current() {
        let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::from_current().unwrap());
        let mut timeout = Timeout::new(scheduler, Duration::from_secs(10), Arc::new(|_| {}));

        timeout.arm();
        assert!(timeout.is_armed());
        timeout.disarm();
        assert!(!timeout.is_armed());
        assert!(!timeout.is_current(1));
    }

    #[test]
    fn from_current_outside_runtime() {
        assert!(matches!(
            TokioScheduler::from_current(),
            Err(SchedulerError::NoRuntime)
        ));
    }
}

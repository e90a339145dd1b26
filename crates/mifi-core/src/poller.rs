// ── Background poller ──
//
// One cancellable task per running poller. Each tick fetches the device
// status (which doubles as the session check), then the SMS count, and
// refetches the inbox only when the count moved. Results go out through
// `watch` channels (latest values) and a `broadcast` channel (events).
//
// Start/stop state lives in a guarded slot holding the task's cancellation
// token and a generation number. `stop()` only takes the slot and cancels,
// so it never blocks; a task that stops itself releases the slot only if
// it still owns it.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use mifi_api::{DeviceStatus, SmsMessage};

use crate::error::CoreError;

const EVENT_CHANNEL_SIZE: usize = 64;

// ── Data source ──────────────────────────────────────────────────

/// What a poll tick reads from. Implemented over the live device by the
/// [`Controller`](crate::Controller); tests substitute scripted sources.
pub trait PollSource: Send + Sync + 'static {
    fn device_status(&self) -> impl Future<Output = Result<DeviceStatus, CoreError>> + Send;

    fn sms_count(&self) -> impl Future<Output = Result<u32, CoreError>> + Send;

    /// The inbox page the poller publishes.
    fn sms_list(&self) -> impl Future<Output = Result<Vec<SmsMessage>, CoreError>> + Send;

    /// Log in again after the session was lost.
    fn reauthenticate(&self) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── State and events ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PollerState {
    Idle,
    Running,
}

/// Why a poller left [`PollerState::Running`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// [`Poller::stop`] was called.
    Requested,
    /// A status fetch failed and no re-login was attempted.
    SessionLost,
    /// A status fetch failed and the one re-login attempt failed too.
    ReconnectFailed,
}

#[derive(Debug, Clone)]
pub enum PollEvent {
    Status(Arc<DeviceStatus>),
    /// The inbox was refetched after the message count changed.
    Messages(Arc<Vec<SmsMessage>>),
    /// The message count rose by `count` to `total`.
    NewMessages { count: u32, total: u32 },
    Stopped(StopReason),
}

// ── SMS change tracking ──────────────────────────────────────────

/// Outcome of observing a changed message count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmsChange {
    pub total: u32,
    /// How many messages arrived since the previous observation. Zero on
    /// the first observation and when the count fell.
    pub new_messages: u32,
}

/// Last-seen SMS count, owned by the poll task.
#[derive(Debug, Default)]
pub struct SmsTracker {
    last: Option<u32>,
}

impl SmsTracker {
    /// Record `count`. `None` when unchanged; otherwise the change, which
    /// calls for an inbox refetch.
    pub fn observe(&mut self, count: u32) -> Option<SmsChange> {
        let previous = self.last.replace(count);
        if previous == Some(count) {
            return None;
        }
        Some(SmsChange {
            total: count,
            new_messages: previous.map_or(0, |prev| count.saturating_sub(prev)),
        })
    }
}

// ── Poller ───────────────────────────────────────────────────────

/// Periodic status/SMS poller.
///
/// Cheaply cloneable; clones drive the same task.
pub struct Poller<S> {
    inner: Arc<PollerInner<S>>,
}

struct PollerInner<S> {
    source: S,
    interval: Duration,
    auto_reconnect: bool,
    state: watch::Sender<PollerState>,
    status: watch::Sender<Option<Arc<DeviceStatus>>>,
    messages: watch::Sender<Arc<Vec<SmsMessage>>>,
    events: broadcast::Sender<PollEvent>,
    slot: Mutex<Option<Slot>>,
    generation: AtomicU64,
}

struct Slot {
    cancel: CancellationToken,
    generation: u64,
}

impl<S> Clone for Poller<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: PollSource> Poller<S> {
    pub fn new(source: S, interval: Duration, auto_reconnect: bool) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        let (status, _) = watch::channel(None);
        let (messages, _) = watch::channel(Arc::new(Vec::new()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        Self {
            inner: Arc::new(PollerInner {
                source,
                interval,
                auto_reconnect,
                state,
                status,
                messages,
                events,
                slot: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the poll task. The first tick fires one interval from now.
    ///
    /// Returns `false` (and does nothing) if already running. Must be
    /// called within a Tokio runtime.
    pub fn start(&self) -> bool {
        let mut slot = self.lock_slot();
        if slot.is_some() {
            debug!("poller already running");
            return false;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = CancellationToken::new();
        *slot = Some(Slot {
            cancel: cancel.clone(),
            generation,
        });
        self.inner.state.send_replace(PollerState::Running);
        drop(slot);

        tokio::spawn(poll_task(self.clone(), cancel, generation));
        info!(interval = ?self.inner.interval, "poller started");
        true
    }

    /// Stop polling. Idempotent and non-blocking; safe after the poller
    /// stopped itself. An in-flight tick is abandoned at its next await.
    pub fn stop(&self) {
        let mut slot = self.lock_slot();
        let Some(running) = slot.take() else {
            return;
        };
        running.cancel.cancel();
        self.inner.state.send_replace(PollerState::Idle);
        drop(slot);
        self.announce_stop(StopReason::Requested);
    }

    pub fn state(&self) -> PollerState {
        *self.inner.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state() == PollerState::Running
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.inner.events.subscribe()
    }

    pub fn state_watch(&self) -> watch::Receiver<PollerState> {
        self.inner.state.subscribe()
    }

    pub fn status_watch(&self) -> watch::Receiver<Option<Arc<DeviceStatus>>> {
        self.inner.status.subscribe()
    }

    pub fn messages_watch(&self) -> watch::Receiver<Arc<Vec<SmsMessage>>> {
        self.inner.messages.subscribe()
    }

    /// Most recent status published by a tick.
    pub fn latest_status(&self) -> Option<Arc<DeviceStatus>> {
        self.inner.status.borrow().clone()
    }

    // ── Internals ────────────────────────────────────────────────

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Option<Slot>> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Release the slot from inside the task, unless a `stop()` (or a
    /// later `start()`) already replaced it.
    fn self_stop(&self, generation: u64, reason: StopReason) {
        let mut slot = self.lock_slot();
        if slot.as_ref().is_none_or(|s| s.generation != generation) {
            return;
        }
        *slot = None;
        self.inner.state.send_replace(PollerState::Idle);
        drop(slot);
        self.announce_stop(reason);
    }

    fn announce_stop(&self, reason: StopReason) {
        let _ = self.inner.events.send(PollEvent::Stopped(reason));
        info!(%reason, "poller stopped");
    }

    /// One poll tick. `Err` means the task should stop.
    async fn tick(&self, tracker: &mut SmsTracker) -> Result<(), StopReason> {
        let source = &self.inner.source;

        let status = match source.device_status().await {
            Ok(status) => status,
            Err(e) => self.recover(e).await?,
        };

        let status = Arc::new(status);
        self.inner.status.send_replace(Some(Arc::clone(&status)));
        let _ = self.inner.events.send(PollEvent::Status(status));

        let count = match source.sms_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "SMS count fetch failed");
                return Ok(());
            }
        };

        let Some(change) = tracker.observe(count) else {
            return Ok(());
        };
        debug!(total = change.total, new = change.new_messages, "SMS count changed");

        match source.sms_list().await {
            Ok(list) => {
                let list = Arc::new(list);
                self.inner.messages.send_replace(Arc::clone(&list));
                let _ = self.inner.events.send(PollEvent::Messages(list));
            }
            Err(e) => warn!(error = %e, "SMS list fetch failed"),
        }

        if change.new_messages > 0 {
            info!(count = change.new_messages, total = change.total, "new SMS received");
            let _ = self.inner.events.send(PollEvent::NewMessages {
                count: change.new_messages,
                total: change.total,
            });
        }
        Ok(())
    }

    /// The status fetch failed: the session is gone. Re-login once if
    /// allowed, then retry the fetch.
    async fn recover(&self, err: CoreError) -> Result<DeviceStatus, StopReason> {
        if !self.inner.auto_reconnect {
            info!(error = %err, "status fetch failed, session presumed lost");
            return Err(StopReason::SessionLost);
        }

        debug!(error = %err, "status fetch failed, re-authenticating");
        let source = &self.inner.source;
        if let Err(e) = source.reauthenticate().await {
            info!(error = %e, "re-authentication failed");
            return Err(StopReason::ReconnectFailed);
        }

        match source.device_status().await {
            Ok(status) => {
                info!("session re-established");
                Ok(status)
            }
            Err(e) => {
                info!(error = %e, "status fetch failed after re-authentication");
                Err(StopReason::ReconnectFailed)
            }
        }
    }
}

// ── Background task ──────────────────────────────────────────────

async fn poll_task<S: PollSource>(poller: Poller<S>, cancel: CancellationToken, generation: u64) {
    let mut interval = tokio::time::interval(poller.inner.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    let mut tracker = SmsTracker::default();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let outcome = tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    outcome = poller.tick(&mut tracker) => outcome,
                };
                if let Err(reason) = outcome {
                    poller.self_stop(generation, reason);
                    break;
                }
            }
        }
    }
    debug!(generation, "poll task exited");
}

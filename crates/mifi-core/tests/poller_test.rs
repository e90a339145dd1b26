#![allow(clippy::unwrap_used)]
// Poller behavior against a scripted source on a paused clock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::Instant;

use mifi_core::{CoreError, DeviceStatus, PollEvent, PollSource, Poller, PollerState, SmsMessage, StopReason};

const INTERVAL: Duration = Duration::from_secs(3);

// ── Scripted source ─────────────────────────────────────────────────

#[derive(Default)]
struct Script {
    counts: Mutex<VecDeque<u32>>,
    last_count: AtomicU32,
    /// Upcoming status calls that fail.
    failing_status: AtomicU32,
    reauth_ok: AtomicBool,
    status_calls: AtomicU32,
    list_calls: AtomicU32,
    reauth_calls: AtomicU32,
    first_status_at: Mutex<Option<Instant>>,
}

impl Script {
    fn with_counts(counts: &[u32]) -> Arc<Self> {
        let script = Self::default();
        script.counts.lock().unwrap().extend(counts);
        Arc::new(script)
    }
}

struct FakeSource(Arc<Script>);

impl PollSource for FakeSource {
    async fn device_status(&self) -> Result<DeviceStatus, CoreError> {
        self.0.status_calls.fetch_add(1, Ordering::SeqCst);
        self.0
            .first_status_at
            .lock()
            .unwrap()
            .get_or_insert_with(Instant::now);

        let failing = self.0.failing_status.load(Ordering::SeqCst);
        if failing > 0 {
            self.0.failing_status.store(failing - 1, Ordering::SeqCst);
            return Err(CoreError::Timeout);
        }
        Ok(DeviceStatus {
            network_type: "LTE".into(),
            ..DeviceStatus::default()
        })
    }

    async fn sms_count(&self) -> Result<u32, CoreError> {
        let next = self.0.counts.lock().unwrap().pop_front();
        let count = next.unwrap_or_else(|| self.0.last_count.load(Ordering::SeqCst));
        self.0.last_count.store(count, Ordering::SeqCst);
        Ok(count)
    }

    async fn sms_list(&self) -> Result<Vec<SmsMessage>, CoreError> {
        self.0.list_calls.fetch_add(1, Ordering::SeqCst);
        let count = self.0.last_count.load(Ordering::SeqCst);
        Ok((0..count)
            .map(|i| SmsMessage {
                id: i.to_string(),
                ..SmsMessage::default()
            })
            .collect())
    }

    async fn reauthenticate(&self) -> Result<(), CoreError> {
        self.0.reauth_calls.fetch_add(1, Ordering::SeqCst);
        if self.0.reauth_ok.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CoreError::AuthenticationFailed {
                message: "bad password".into(),
            })
        }
    }
}

fn poller(script: &Arc<Script>, auto_reconnect: bool) -> Poller<FakeSource> {
    Poller::new(FakeSource(Arc::clone(script)), INTERVAL, auto_reconnect)
}

// ── SMS change detection ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_new_message_events_follow_count_increases() {
    let script = Script::with_counts(&[0, 0, 3, 3, 5]);
    let poller = poller(&script, false);
    let mut rx = poller.subscribe();
    assert!(poller.start());

    let mut statuses = 0;
    let mut deltas = Vec::new();
    let mut lists = Vec::new();
    while statuses < 6 {
        match rx.recv().await.unwrap() {
            PollEvent::Status(_) => statuses += 1,
            PollEvent::NewMessages { count, total } => deltas.push((count, total)),
            PollEvent::Messages(list) => lists.push(list.len()),
            PollEvent::Stopped(reason) => panic!("unexpected stop: {reason}"),
        }
    }
    poller.stop();

    assert_eq!(deltas, [(3, 3), (2, 5)]);
    // Refetched on first observation and on each change.
    assert_eq!(lists, [0, 3, 5]);
    assert_eq!(script.list_calls.load(Ordering::SeqCst), 3);
    assert_eq!(poller.messages_watch().borrow().len(), 5);
    assert_eq!(
        poller.latest_status().map(|s| s.network_type.clone()).as_deref(),
        Some("LTE")
    );
}

#[tokio::test(start_paused = true)]
async fn test_first_tick_fires_one_interval_after_start() {
    let script = Script::with_counts(&[0]);
    let poller = poller(&script, false);
    let mut rx = poller.subscribe();

    let started = Instant::now();
    poller.start();
    assert!(matches!(rx.recv().await.unwrap(), PollEvent::Status(_)));
    poller.stop();

    let first = script.first_status_at.lock().unwrap().unwrap();
    assert_eq!(first.duration_since(started), INTERVAL);
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_session_loss_self_stops_and_stop_stays_safe() {
    let script = Script::with_counts(&[]);
    script.failing_status.store(u32::MAX, Ordering::SeqCst);
    let poller = poller(&script, false);
    let mut rx = poller.subscribe();
    let mut state = poller.state_watch();

    poller.start();
    assert_eq!(*state.borrow_and_update(), PollerState::Running);

    match rx.recv().await.unwrap() {
        PollEvent::Stopped(reason) => assert_eq!(reason, StopReason::SessionLost),
        other => panic!("expected Stopped, got {other:?}"),
    }
    assert_eq!(poller.state(), PollerState::Idle);
    assert_eq!(script.reauth_calls.load(Ordering::SeqCst), 0);

    poller.stop();
    poller.stop();
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    tokio::time::sleep(INTERVAL * 5).await;
    assert_eq!(script.status_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_ticks() {
    let script = Script::with_counts(&[1]);
    let poller = poller(&script, false);
    let mut rx = poller.subscribe();

    poller.start();
    assert!(matches!(rx.recv().await.unwrap(), PollEvent::Status(_)));
    poller.stop();
    assert_eq!(poller.state(), PollerState::Idle);

    let calls = script.status_calls.load(Ordering::SeqCst);
    tokio::time::sleep(INTERVAL * 5).await;
    assert_eq!(script.status_calls.load(Ordering::SeqCst), calls);

    let mut saw_requested = false;
    while let Ok(event) = rx.try_recv() {
        if let PollEvent::Stopped(reason) = event {
            assert_eq!(reason, StopReason::Requested);
            saw_requested = true;
        }
    }
    assert!(saw_requested);
}

#[tokio::test(start_paused = true)]
async fn test_start_is_a_noop_while_running_and_restartable() {
    let script = Script::with_counts(&[0]);
    let poller = poller(&script, false);

    assert!(poller.start());
    assert!(!poller.start());
    assert!(poller.is_running());

    poller.stop();
    assert!(!poller.is_running());

    let mut rx = poller.subscribe();
    assert!(poller.start());
    assert!(matches!(rx.recv().await.unwrap(), PollEvent::Status(_)));
    poller.stop();
}

// ── Auto-reconnect ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_auto_reconnect_recovers_lost_session() {
    let script = Script::with_counts(&[2]);
    script.failing_status.store(1, Ordering::SeqCst);
    script.reauth_ok.store(true, Ordering::SeqCst);
    let poller = poller(&script, true);
    let mut rx = poller.subscribe();

    poller.start();
    assert!(matches!(rx.recv().await.unwrap(), PollEvent::Status(_)));
    assert!(poller.is_running());
    assert_eq!(script.reauth_calls.load(Ordering::SeqCst), 1);
    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn test_failed_reconnect_self_stops() {
    let script = Script::with_counts(&[]);
    script.failing_status.store(u32::MAX, Ordering::SeqCst);
    let poller = poller(&script, true);
    let mut rx = poller.subscribe();

    poller.start();
    match rx.recv().await.unwrap() {
        PollEvent::Stopped(reason) => assert_eq!(reason, StopReason::ReconnectFailed),
        other => panic!("expected Stopped, got {other:?}"),
    }
    assert_eq!(script.reauth_calls.load(Ordering::SeqCst), 1);
    assert!(!poller.is_running());
}

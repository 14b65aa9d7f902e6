//! Event Sink Adapters
//!
//! Implementations of the `LedgerEventSink` trait.

use crate::domain::events::LedgerEvent;
use crate::ports::outbound::{LedgerEventSink, PublishError};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl LedgerEventSink for NoOpEventSink {
    fn publish(&self, _event: LedgerEvent) -> Result<(), PublishError> {
        Ok(())
    }
}

/// In-process fan-out over `tokio::sync::broadcast`.
///
/// Events sent while nobody is subscribed are dropped, not buffered.
pub struct BroadcastEventSink {
    sender: broadcast::Sender<LedgerEvent>,
    events_published: AtomicU64,
    capacity: usize,
}

impl BroadcastEventSink {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// New receiver that sees events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl LedgerEventSink for BroadcastEventSink {
    fn publish(&self, event: LedgerEvent) -> Result<(), PublishError> {
        let event_type = event.event_type();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event_type, receivers, "[ledger] Event published");
            }
            Err(_) => {
                debug!(event_type, "[ledger] Event dropped (no receivers)");
            }
        }
        Ok(())
    }
}

/// Sink that keeps every event, for assertions in tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct RecordingEventSink {
    events: parking_lot::Mutex<Vec<LedgerEvent>>,
    fail: std::sync::atomic::AtomicBool,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later publish return an error (events are still recorded).
    pub fn fail_publishes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl LedgerEventSink for RecordingEventSink {
    fn publish(&self, event: LedgerEvent) -> Result<(), PublishError> {
        self.events.lock().push(event);
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::Unavailable("recording sink closed".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::address::Address;
    use crate::domain::receipts::CommitId;

    fn event() -> LedgerEvent {
        LedgerEvent::CounterInitialized {
            commit_id: CommitId::new(),
            address: Address::counter(),
        }
    }

    #[test]
    fn test_broadcast_without_subscribers_is_ok() {
        let sink = BroadcastEventSink::with_capacity(8);
        assert!(sink.publish(event()).is_ok());
        assert_eq!(sink.events_published(), 1);
        assert_eq!(sink.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_delivers_to_subscriber() {
        let sink = BroadcastEventSink::with_capacity(8);
        let mut rx = sink.subscribe();

        let sent = event();
        sink.publish(sent.clone()).unwrap();

        assert_eq!(rx.recv().await.unwrap(), sent);
    }

    #[test]
    fn test_recording_sink_failure_mode() {
        let sink = RecordingEventSink::new();
        sink.fail_publishes(true);
        assert!(sink.publish(event()).is_err());
        assert_eq!(sink.events().len(), 1);
    }
}

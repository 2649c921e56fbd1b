//! Change notifications for whatever renders the dashboard

use tokio::sync::broadcast::{self, error::TryRecvError, Receiver, Sender};
use tracing::warn;

/// Events buffered per subscriber before the oldest are dropped
const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxEvent {
    /// A user's notification list changed
    Changed { user_id: String, unread: usize },
    SessionStarted { user_id: String },
    SessionEnded { user_id: String },
}

/// Fan-out of [`InboxEvent`]s to any number of subscribers
///
/// Subscribers only see events emitted after they subscribed. Sending and
/// receiving are synchronous, so no runtime is needed.
#[derive(Debug)]
pub struct EventBus {
    notify: Sender<InboxEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(EVENT_CAPACITY);
        Self { notify }
    }

    pub fn subscribe(&self) -> Receiver<InboxEvent> {
        self.notify.subscribe()
    }

    pub fn emit(&self, event: InboxEvent) {
        // Err only means nobody is listening
        let _ = self.notify.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.notify.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Take every event currently queued for `receiver`, without blocking
///
/// A subscriber that fell more than the channel capacity behind loses the
/// oldest events; that is logged and draining carries on.
pub fn drain(receiver: &mut Receiver<InboxEvent>) -> Vec<InboxEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Event subscriber fell behind, events dropped");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    events
}

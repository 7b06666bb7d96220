//! Event hub - process-wide status-changed subscription point
//!
//! # Architecture
//!
//! ```text
//! LifecycleController ──► publish() ──► broadcast::Sender
//!                                            │
//!                                       Dispatcher task
//!                                            │
//!                       ┌────────────────────┼──────────────────┐
//!                       ▼                    ▼                  ▼
//!                 mpsc "kds"          mpsc "notifier"     subscribe()
//!                 (named, deduped)    (named, deduped)    (anonymous)
//! ```
//!
//! Named registration is deduplicated: registering a name that is already
//! live replaces the previous registration (its channel closes), so a
//! component re-initialized many times never stacks duplicate listeners.
//!
//! Delivery to named consumers is best-effort: a full buffer drops the
//! event with a warning rather than blocking the commit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use shared::lifecycle::StatusChangedEvent;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Default buffer size for named consumer channels
const NAMED_CHANNEL_BUFFER: usize = 64;

/// Process-wide status-changed event hub
#[derive(Debug)]
pub struct EventHub {
    /// Fan-out channel for committed status changes
    tx: broadcast::Sender<StatusChangedEvent>,
    /// Named consumers (name -> sender); insert replaces, which closes the
    /// previous registration's receiver
    named: DashMap<String, mpsc::Sender<StatusChangedEvent>>,
    /// Shutdown signal for the dispatcher task
    shutdown_token: CancellationToken,
    /// Guards against starting the dispatcher twice
    dispatcher_started: AtomicBool,
}

impl EventHub {
    /// Create a hub with the given broadcast capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            named: DashMap::new(),
            shutdown_token: CancellationToken::new(),
            dispatcher_started: AtomicBool::new(false),
        }
    }

    /// Publish a committed status change to all subscribers
    ///
    /// A send error only means no subscriber is currently attached, which
    /// is fine: transitions never depend on listeners.
    pub fn publish(&self, event: StatusChangedEvent) {
        let _ = self.tx.send(event);
    }

    /// Anonymous subscription (receives every event from now on)
    pub fn subscribe(&self) -> broadcast::Receiver<StatusChangedEvent> {
        self.tx.subscribe()
    }

    /// Register a named consumer, replacing any live registration of the
    /// same name
    ///
    /// The returned receiver yields every event published while the
    /// registration is live. Re-registering closes the previous channel,
    /// so exactly one consumer per name receives events.
    pub fn register(&self, name: impl Into<String>) -> mpsc::Receiver<StatusChangedEvent> {
        let name = name.into();
        let (tx, rx) = mpsc::channel(NAMED_CHANNEL_BUFFER);
        if self.named.insert(name.clone(), tx).is_some() {
            tracing::debug!(consumer = %name, "replaced existing hub registration");
        } else {
            tracing::debug!(consumer = %name, "registered hub consumer");
        }
        rx
    }

    /// Remove a named consumer
    pub fn unregister(&self, name: &str) {
        self.named.remove(name);
    }

    /// Number of live named consumers
    pub fn named_count(&self) -> usize {
        self.named.len()
    }

    /// Start the dispatcher task forwarding broadcasts to named consumers
    ///
    /// Idempotent: later calls are no-ops.
    pub fn start_dispatcher(self: Arc<Self>) {
        if self.dispatcher_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut source = self.subscribe();
        let hub = self;
        tokio::spawn(async move {
            tracing::info!("Event hub dispatcher started");
            loop {
                tokio::select! {
                    _ = hub.shutdown_token.cancelled() => {
                        tracing::info!("Event hub dispatcher stopping");
                        break;
                    }
                    recv = source.recv() => match recv {
                        Ok(event) => hub.dispatch(event),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::error!(
                                skipped = n,
                                "Event hub dispatcher lagged, events skipped"
                            );
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Event hub channel closed, dispatcher stopping");
                            break;
                        }
                    }
                }
            }
        });
    }

    /// Forward one event to every named consumer, best-effort
    fn dispatch(&self, event: StatusChangedEvent) {
        let mut dead: Vec<String> = Vec::new();

        for entry in self.named.iter() {
            match entry.value().try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        consumer = %entry.key(),
                        entity_id = %event.entity_id,
                        "consumer channel full, event dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    dead.push(entry.key().clone());
                }
            }
        }

        for name in dead {
            // Only drop the entry if it still holds a closed sender; a
            // re-registration may have replaced it concurrently.
            self.named
                .remove_if(&name, |_, sender| sender.is_closed());
            tracing::debug!(consumer = %name, "removed closed hub consumer");
        }
    }

    /// Signal the dispatcher to stop
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::lifecycle::{OrderStatus, StatusChange};

    fn make_event(id: &str) -> StatusChangedEvent {
        StatusChangedEvent::new(
            format!("order:{id}"),
            StatusChange::Order {
                previous: OrderStatus::Confirmed,
                new: OrderStatus::Preparing,
            },
        )
    }

    #[tokio::test]
    async fn test_anonymous_subscribe() {
        let hub = EventHub::new(16);
        let mut rx = hub.subscribe();

        hub.publish(make_event("a"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.entity_id, "order:a");
    }

    #[tokio::test]
    async fn test_named_registration_receives_events() {
        let hub = Arc::new(EventHub::new(16));
        let mut rx = hub.register("kds");
        hub.clone().start_dispatcher();

        hub.publish(make_event("a"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.entity_id, "order:a");
    }

    #[tokio::test]
    async fn test_duplicate_registration_replaces() {
        let hub = Arc::new(EventHub::new(16));

        let mut first = hub.register("kds");
        let mut second = hub.register("kds");
        assert_eq!(hub.named_count(), 1);

        hub.clone().start_dispatcher();
        hub.publish(make_event("a"));

        // The replaced registration's channel is closed; only the live
        // one delivers.
        assert!(first.recv().await.is_none());
        let received = second.recv().await.unwrap();
        assert_eq!(received.entity_id, "order:a");
    }

    #[tokio::test]
    async fn test_unregister() {
        let hub = Arc::new(EventHub::new(16));
        let mut rx = hub.register("printer");
        hub.unregister("printer");
        assert_eq!(hub.named_count(), 0);

        hub.clone().start_dispatcher();
        hub.publish(make_event("a"));

        assert!(rx.recv().await.is_none());
    }
}

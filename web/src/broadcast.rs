//! Per-department event fan-out for displays and admin consoles.
//!
//! Every department has one logical channel. Queue mutations publish an event
//! to the department's topic; signage displays and admin consoles subscribe to
//! the topic and filter client-side using the window tag carried inside the
//! event.
//!
//! # Architecture
//!
//! ```text
//! Dispatch Engine          TopicBroadcaster              Subscribers
//!       │                         │                           │
//!       ├─ publish("registrar") ─>│                           │
//!       │                         ├─ fan out ────────────────>│ display (window 1)
//!       │                         ├─ fan out ────────────────>│ display (window 2)
//!       │                         ├─ fan out ────────────────>│ admin console
//!       │                         │                           │
//!       ├─ publish("cashier") ───>│                           │
//!       │                         ├─ (no cashier subscribers) │
//! ```
//!
//! # Delivery contract
//!
//! Delivery is at-most-once, best-effort: a subscriber that is disconnected
//! (or lagging past the channel capacity) at publish time misses the event.
//! Subscribers must reconcile with a full queue-view fetch on (re)connect;
//! the event stream is a low-latency nudge, not a durable log.
//!
//! Publishing never blocks and never fails the mutation that triggered it.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Default per-topic channel capacity (events buffered per subscriber).
const DEFAULT_CAPACITY: usize = 1000;

/// Type alias for the channels map to reduce complexity.
type ChannelsMap<A> = Arc<RwLock<HashMap<String, broadcast::Sender<(String, A)>>>>;

/// Topic broadcaster for per-department event distribution.
///
/// Each topic (department) has its own broadcast channel, created lazily on
/// first publish or subscribe. Clones share the same channel map.
///
/// # Type Parameters
///
/// - `A`: Event type (must be Clone + Send)
///
/// # Example
///
/// ```ignore
/// let broadcaster = TopicBroadcaster::<QueueEvent>::new();
///
/// // Publish an event to a department's topic
/// broadcaster.publish("registrar", event).await;
///
/// // Subscribe to a department's topic
/// let mut rx = broadcaster.subscribe("registrar").await;
/// while let Ok((topic, event)) = rx.recv().await {
///     // Forward event to the connected display
/// }
/// ```
pub struct TopicBroadcaster<A>
where
    A: Clone + Send + 'static,
{
    /// Map of topic name → broadcast channel
    channels: ChannelsMap<A>,
    /// Capacity used when creating a topic's channel
    capacity: usize,
}

impl<A> TopicBroadcaster<A>
where
    A: Clone + Send + Sync + 'static,
{
    /// Create a new topic broadcaster with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new topic broadcaster with a custom channel capacity.
    ///
    /// A subscriber that falls more than `capacity` events behind starts
    /// missing events (at-most-once delivery).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish an event to a specific topic.
    ///
    /// All subscribers of this topic receive the event. Publishing to a topic
    /// with no subscribers is not an error; the event is simply dropped.
    pub async fn publish(&self, topic: impl Into<String>, event: A) {
        let topic = topic.into();
        let mut channels = self.channels.write().await;

        // Get or create channel for this topic
        let sender = channels
            .entry(topic.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0);

        // Broadcast to all subscribers (ignore if no receivers)
        let _ = sender.send((topic, event));
    }

    /// Subscribe to a specific topic.
    ///
    /// Returns a receiver that will get all events published to this topic
    /// from this point on.
    pub async fn subscribe(&self, topic: impl Into<String>) -> broadcast::Receiver<(String, A)> {
        let topic = topic.into();
        let mut channels = self.channels.write().await;

        // Get or create channel for this topic
        let sender = channels
            .entry(topic)
            .or_insert_with(|| broadcast::channel(self.capacity).0);

        sender.subscribe()
    }

    /// Get count of active topics.
    pub async fn topic_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl<A> Default for TopicBroadcaster<A>
where
    A: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for TopicBroadcaster<A>
where
    A: Clone + Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcaster_starts_with_no_topics() {
        let broadcaster = TopicBroadcaster::<String>::new();
        assert_eq!(broadcaster.topic_count().await, 0);
    }

    #[tokio::test]
    async fn test_publish_and_subscribe() {
        let broadcaster = TopicBroadcaster::<String>::new();

        // Subscribe to a department topic
        let mut rx = broadcaster.subscribe("registrar").await;

        // Publish event
        broadcaster
            .publish("registrar", "ticket_created".to_string())
            .await;

        // Receive event
        let (topic, event) = rx.recv().await.expect("Should receive event");
        assert_eq!(topic, "registrar");
        assert_eq!(event, "ticket_created");
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let broadcaster = TopicBroadcaster::<String>::new();

        // A display and an admin console on the same department
        let mut rx1 = broadcaster.subscribe("registrar").await;
        let mut rx2 = broadcaster.subscribe("registrar").await;

        broadcaster
            .publish("registrar", "queue_update".to_string())
            .await;

        // Both should receive
        let (_, msg1) = rx1.recv().await.expect("rx1 should receive");
        let (_, msg2) = rx2.recv().await.expect("rx2 should receive");

        assert_eq!(msg1, "queue_update");
        assert_eq!(msg2, "queue_update");
    }

    #[tokio::test]
    async fn test_topic_isolation() {
        let broadcaster = TopicBroadcaster::<String>::new();

        // Subscribe to different departments
        let mut rx_registrar = broadcaster.subscribe("registrar").await;
        let mut rx_cashier = broadcaster.subscribe("cashier").await;

        broadcaster
            .publish("registrar", "ticket_created".to_string())
            .await;

        // Only the registrar subscriber should receive
        let (_, msg) = rx_registrar.recv().await.expect("registrar should receive");
        assert_eq!(msg, "ticket_created");

        // The cashier subscriber should not receive (try_recv should be empty)
        assert!(rx_cashier.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_to_newest() {
        kiosk_testing::helpers::init_tracing();

        // Capacity 1: a slow subscriber keeps only the newest event
        let broadcaster = TopicBroadcaster::<String>::with_capacity(1);

        let mut rx = broadcaster.subscribe("registrar").await;

        broadcaster.publish("registrar", "first".to_string()).await;
        broadcaster.publish("registrar", "second".to_string()).await;

        // First recv reports the lag, next recv returns the newest event
        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                assert_eq!(skipped, 1);
            }
            other => panic!("Expected lag error, got {other:?}"),
        }

        let (_, event) = rx.recv().await.expect("Should receive newest event");
        assert_eq!(event, "second");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let broadcaster = TopicBroadcaster::<String>::new();

        // No subscribers yet; publish must not fail
        broadcaster
            .publish("admissions", "queue_update".to_string())
            .await;

        assert_eq!(broadcaster.topic_count().await, 1);

        // A later subscriber does not see the earlier event
        let mut rx = broadcaster.subscribe("admissions").await;
        assert!(rx.try_recv().is_err());
    }
}

//! # Message Publisher
//!
//! Publishing side of the bus, plus the in-memory bus used by single-host
//! deployments and the test suite.

use crate::message::{BusMessage, TopicFilter};
use crate::subscriber::{MessageSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Errors from publishing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The broker link is down; nothing was sent.
    #[error("Message bus disconnected")]
    Disconnected,
}

/// Trait for publishing messages to the bus.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish `payload` on `topic`.
    ///
    /// Returns the number of subscribers the message reached. Zero is not an
    /// error; the broker simply had no listener.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<usize, BusError>;

    /// Whether the broker link is currently up.
    fn is_connected(&self) -> bool;

    /// Total publish attempts.
    fn messages_published(&self) -> u64;
}

/// In-memory bus built on `tokio::sync::broadcast`.
///
/// Every subscriber sees every message, including the publisher's own,
/// the same as an MQTT client subscribed to the topics it publishes on.
pub struct InMemoryMessageBus {
    sender: broadcast::Sender<BusMessage>,
    connected: AtomicBool,
    messages_published: AtomicU64,
    capacity: usize,
}

impl InMemoryMessageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            connected: AtomicBool::new(true),
            messages_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Simulate the broker link going down or coming back.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
        debug!(connected, "Bus link state changed");
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePublisher for InMemoryMessageBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<usize, BusError> {
        self.messages_published.fetch_add(1, Ordering::Relaxed);

        if !self.is_connected() {
            warn!(topic, "Publish failed: bus disconnected");
            return Err(BusError::Disconnected);
        }

        let bytes = payload.len();
        match self.sender.send(BusMessage::new(topic, payload)) {
            Ok(receivers) => {
                debug!(topic, bytes, receivers, "Message published");
                Ok(receivers)
            }
            Err(_) => {
                debug!(topic, "Message dropped (no receivers)");
                Ok(0)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }
}

impl MessageSubscriber for InMemoryMessageBus {
    fn subscribe(&self, filter: TopicFilter) -> Subscription {
        debug!(topics = ?filter.topics, "New subscription created");
        Subscription::new(self.sender.subscribe(), filter)
    }
}

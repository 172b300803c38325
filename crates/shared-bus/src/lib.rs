//! # Shared Bus - Topic Messaging Between Gate, Edge and Peers
//!
//! Every interaction a gate node has with the outside world is a message on
//! a named topic: authentication records going up to the edge server,
//! verdicts and list updates coming down, vote traffic between peers.
//!
//! ```text
//! ┌──────────────┐   publish()    ┌──────────────┐   subscribe()   ┌──────────────┐
//! │  Gate node   │ ─────────────▶ │     Bus      │ ──────────────▶ │ Edge / peers │
//! └──────────────┘                └──────────────┘                 └──────────────┘
//! ```
//!
//! Payloads are opaque bytes here; `shared-types` owns the JSON shapes.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod message;
pub mod publisher;
pub mod subscriber;

pub use message::{BusMessage, TopicFilter};
pub use publisher::{BusError, InMemoryMessageBus, MessagePublisher};
pub use subscriber::{MessageStream, MessageSubscriber, Subscription, SubscriptionError};

/// Maximum messages buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

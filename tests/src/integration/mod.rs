//! # Integration Tests
//!
//! Gates built through `GateContainer::with_parts` on a shared
//! `InMemoryMessageBus`, next to small scripted edge tasks that answer on
//! the same topics the real edge server uses.

pub mod flows;
pub mod peers;

#[cfg(test)]
pub(crate) mod support;

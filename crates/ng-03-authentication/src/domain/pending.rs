//! # Pending Edge Query
//!
//! Single slot holding the identifier the node is waiting on and the
//! channel that releases the waiter. Armed before the challenge is
//! published so a fast verdict can never arrive to an empty slot.

use parking_lot::Mutex;
use shared_types::Identifier;
use tokio::sync::oneshot;

struct Slot {
    identifier: Identifier,
    responder: oneshot::Sender<bool>,
}

#[derive(Default)]
pub struct PendingEdgeQuery {
    slot: Mutex<Option<Slot>>,
}

impl PendingEdgeQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting on `identifier`. Any previous slot is discarded and its
    /// waiter sees a closed channel.
    pub fn arm(&self, identifier: Identifier) -> oneshot::Receiver<bool> {
        let (responder, receiver) = oneshot::channel();
        *self.slot.lock() = Some(Slot {
            identifier,
            responder,
        });
        receiver
    }

    /// Identifier currently awaited, if any.
    #[must_use]
    pub fn awaited(&self) -> Option<Identifier> {
        self.slot.lock().as_ref().map(|s| s.identifier.clone())
    }

    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Release the waiter if `identifier` is the one awaited.
    ///
    /// Returns true when the slot was consumed.
    pub fn resolve(&self, identifier: &Identifier, result: bool) -> bool {
        let mut slot = self.slot.lock();
        match slot.take() {
            Some(pending) if pending.identifier == *identifier => {
                // Waiter may already have timed out; the slot is spent either way.
                let _ = pending.responder.send(result);
                true
            }
            other => {
                *slot = other;
                false
            }
        }
    }

    pub fn clear(&self) {
        self.slot.lock().take();
    }
}

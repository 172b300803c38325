//! # Update Waiter
//!
//! Releases a pending `request_update` when a full list is applied.

use parking_lot::Mutex;
use tokio::sync::oneshot;

#[derive(Default)]
pub struct UpdateWaiter {
    slot: Mutex<Option<oneshot::Sender<usize>>>,
}

impl UpdateWaiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self) -> oneshot::Receiver<usize> {
        let (sender, receiver) = oneshot::channel();
        *self.slot.lock() = Some(sender);
        receiver
    }

    /// Wake the waiter with the new entry count. Returns false if none was armed.
    pub fn notify(&self, entries: usize) -> bool {
        match self.slot.lock().take() {
            Some(sender) => sender.send(entries).is_ok(),
            None => false,
        }
    }

    pub fn clear(&self) {
        self.slot.lock().take();
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.slot.lock().is_some()
    }
}

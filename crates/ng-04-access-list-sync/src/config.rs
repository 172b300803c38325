//! Sync configuration.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Indicator toggle period while waiting on the edge.
    pub poll_interval: Duration,
    pub poll_attempts: u32,
    /// Accept bare `["A", ...]` pushes on `/access_list`.
    pub accept_unsigned_lists: bool,
    /// Run a peer majority vote after falling back to the persisted list.
    pub majority_vote_on_fallback: bool,
    /// Period of the background re-sync with the edge. `None` syncs at boot only.
    pub resync_interval: Option<Duration>,
}

impl SyncConfig {
    #[must_use]
    pub fn response_window(&self) -> Duration {
        self.poll_interval * self.poll_attempts
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            poll_attempts: 10,
            accept_unsigned_lists: false,
            majority_vote_on_fallback: true,
            resync_interval: None,
        }
    }
}

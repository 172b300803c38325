use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MajorityVoteConfig {
    /// Peer snapshots collected per round (K).
    pub max_participants: usize,
    pub poll_interval: Duration,
    pub poll_attempts: u32,
    /// Count only the first snapshot from each peer in a round.
    pub dedup_by_peer: bool,
}

impl MajorityVoteConfig {
    /// Longest a round may stay open.
    #[must_use]
    pub fn round_window(&self) -> Duration {
        self.poll_interval * self.poll_attempts
    }
}

impl Default for MajorityVoteConfig {
    fn default() -> Self {
        Self {
            max_participants: 5,
            poll_interval: Duration::from_millis(500),
            poll_attempts: 20,
            dedup_by_peer: true,
        }
    }
}

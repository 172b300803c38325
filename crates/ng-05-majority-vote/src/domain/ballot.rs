//! # Ballot
//!
//! Peer snapshots collected during one round, in arrival order.

use shared_types::{Identifier, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Duplicate,
    Dropped,
}

#[derive(Debug, Clone)]
pub struct Ballot {
    capacity: usize,
    dedup_by_peer: bool,
    votes: Vec<(NodeId, Vec<Identifier>)>,
}

impl Ballot {
    #[must_use]
    pub fn new(capacity: usize, dedup_by_peer: bool) -> Self {
        Self {
            capacity,
            dedup_by_peer,
            votes: Vec::with_capacity(capacity),
        }
    }

    pub fn submit(&mut self, peer: NodeId, snapshot: Vec<Identifier>) -> SubmitOutcome {
        if self.dedup_by_peer && self.votes.iter().any(|(voter, _)| *voter == peer) {
            return SubmitOutcome::Duplicate;
        }
        if self.is_full() {
            return SubmitOutcome::Dropped;
        }
        self.votes.push((peer, snapshot));
        SubmitOutcome::Accepted
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.votes.len() >= self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Snapshots in arrival order.
    #[must_use]
    pub fn into_snapshots(self) -> Vec<Vec<Identifier>> {
        self.votes.into_iter().map(|(_, snapshot)| snapshot).collect()
    }
}

//! # Tally
//!
//! Whole-list plurality with a strict-majority threshold. Lists are equal
//! only if they hold the same identifiers in the same order.

use shared_types::Identifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyResult {
    /// The most frequent snapshot; ties go to the one seen first.
    pub winner: Vec<Identifier>,
    pub votes: usize,
    pub threshold: usize,
    /// Peers plus the local node.
    pub participants: usize,
}

impl TallyResult {
    #[must_use]
    pub fn has_majority(&self) -> bool {
        self.votes >= self.threshold
    }
}

/// Majority threshold for `participants` voters.
#[must_use]
pub fn threshold(participants: usize) -> usize {
    participants / 2 + 1
}

/// Count the local snapshot first, then peers in arrival order.
#[must_use]
pub fn tally(local: &[Identifier], peers: &[Vec<Identifier>]) -> TallyResult {
    let mut candidates: Vec<(&[Identifier], usize)> = Vec::with_capacity(peers.len() + 1);
    let ballots = std::iter::once(local).chain(peers.iter().map(Vec::as_slice));

    for snapshot in ballots {
        match candidates.iter_mut().find(|(candidate, _)| *candidate == snapshot) {
            Some((_, count)) => *count += 1,
            None => candidates.push((snapshot, 1)),
        }
    }

    // Strict comparison keeps the earliest candidate on ties.
    let mut best = (local, 0);
    for &(snapshot, count) in &candidates {
        if count > best.1 {
            best = (snapshot, count);
        }
    }

    let participants = peers.len() + 1;
    TallyResult {
        winner: best.0.to_vec(),
        votes: best.1,
        threshold: threshold(participants),
        participants,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteState {
    #[default]
    Idle,
    Soliciting,
    Tallying,
}

/// How a finished round left the local list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The winning snapshot replaced the local list.
    Applied {
        entries: usize,
        votes: usize,
        participants: usize,
    },
    /// No snapshot reached the threshold.
    Unchanged {
        best_votes: usize,
        threshold: usize,
        participants: usize,
    },
}

/// What happened to an inbound `/device_majority_response`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDisposition {
    Accepted,
    /// Peer already voted this round.
    Duplicate,
    /// Ballot full.
    Dropped,
    OwnResponse,
    NoRound,
    Malformed,
}

use crate::ports::outbound::ReconcileResult;

/// Result of `request_update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The edge answered within the window.
    Updated { entries: usize },
    /// No answer; the persisted list was loaded and peers optionally consulted.
    FellBack {
        loaded: usize,
        vote: Option<ReconcileResult>,
    },
    /// A request was already in flight.
    AlreadyInProgress,
}

/// Effect of an accepted inbound update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateApplied {
    Replaced { entries: usize },
    /// Removal verified; `present` is whether the identifier was in the list.
    Removed { present: bool },
}

//! # Outbound Ports
//!
//! Peer reconciliation is driven through this trait so the vote subsystem
//! does not need to know about sync.

use async_trait::async_trait;

/// What a reconciliation round did to the local list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileResult {
    Applied { entries: usize },
    Unchanged,
    /// The round could not run (already in progress, bus down).
    Skipped(String),
}

#[async_trait]
pub trait MajorityVoteTrigger: Send + Sync {
    async fn reconcile(&self) -> ReconcileResult;
}

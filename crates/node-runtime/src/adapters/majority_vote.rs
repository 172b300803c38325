//! Bridges the sync subsystem's `MajorityVoteTrigger` port onto NG-05.

use async_trait::async_trait;
use ng_04_access_list_sync::{MajorityVoteTrigger, ReconcileResult};
use ng_05_majority_vote::{MajorityVoteApi, RoundOutcome};
use std::sync::Arc;

pub struct MajorityVoteAdapter<V> {
    vote: Arc<V>,
}

impl<V: MajorityVoteApi> MajorityVoteAdapter<V> {
    pub fn new(vote: Arc<V>) -> Self {
        Self { vote }
    }
}

#[async_trait]
impl<V: MajorityVoteApi> MajorityVoteTrigger for MajorityVoteAdapter<V> {
    async fn reconcile(&self) -> ReconcileResult {
        match self.vote.run_round().await {
            Ok(RoundOutcome::Applied { entries, .. }) => ReconcileResult::Applied { entries },
            Ok(RoundOutcome::Unchanged { .. }) => ReconcileResult::Unchanged,
            Err(e) => ReconcileResult::Skipped(e.to_string()),
        }
    }
}

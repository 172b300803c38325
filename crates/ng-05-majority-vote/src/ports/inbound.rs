//! # Inbound Ports

use crate::domain::errors::VoteError;
use crate::domain::state::{ResponseDisposition, RoundOutcome, VoteState};
use async_trait::async_trait;

#[async_trait]
pub trait MajorityVoteApi: Send + Sync {
    /// Run one voting round to completion.
    async fn run_round(&self) -> Result<RoundOutcome, VoteError>;

    /// `/device_majority_response` from a peer.
    fn handle_response(&self, payload: &[u8]) -> ResponseDisposition;

    /// `/device_majority_vote` from a peer. Returns true if a snapshot was sent.
    async fn handle_request(&self, payload: &[u8]) -> Result<bool, VoteError>;

    fn state(&self) -> VoteState;
}

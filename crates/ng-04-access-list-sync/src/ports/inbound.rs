//! # Inbound Ports
//!
//! Raw payload handlers for the dispatcher plus the boot/on-demand request.

use crate::domain::outcome::{SyncOutcome, UpdateApplied};
use crate::error::SyncError;
use async_trait::async_trait;

#[async_trait]
pub trait AccessListSyncApi: Send + Sync {
    /// Ask the edge for the current list, falling back on timeout.
    async fn request_update(&self) -> SyncOutcome;

    /// `/access_list` push.
    fn handle_push(&self, payload: &[u8]) -> Result<UpdateApplied, SyncError>;

    /// `/response_access_list`, plain or with key rotation.
    fn handle_response(&self, payload: &[u8]) -> Result<UpdateApplied, SyncError>;

    /// `/remove_uid`.
    fn handle_removal(&self, payload: &[u8]) -> Result<UpdateApplied, SyncError>;
}

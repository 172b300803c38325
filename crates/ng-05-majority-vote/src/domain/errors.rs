use ng_01_access_store::AccessStoreError;
use shared_bus::BusError;
use shared_types::MessageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("Majority vote already in progress")]
    AlreadyInProgress,

    #[error("Vote message encoding failed: {0}")]
    Encoding(#[from] MessageError),

    #[error("Vote solicitation not sent: {0}")]
    Publish(#[from] BusError),

    #[error("Winning snapshot not applied: {0}")]
    Store(#[from] AccessStoreError),
}

//! Errors for inbound list updates.

use ng_01_access_store::AccessStoreError;
use ng_02_crypto_gateway::CryptoError;
use shared_types::MessageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Malformed update: {0}")]
    Malformed(#[from] MessageError),

    #[error("Update signature rejected: {0}")]
    InvalidSignature(CryptoError),

    #[error("Unsigned access list rejected")]
    UnsignedRejected,

    #[error("Rotated encryption key unusable: {0}")]
    KeyRotation(CryptoError),

    #[error("Access store: {0}")]
    Store(#[from] AccessStoreError),
}

impl SyncError {
    /// Whether the in-memory list was still changed.
    ///
    /// Only a persistence failure after a successful in-memory apply.
    #[must_use]
    pub fn applied_in_memory(&self) -> bool {
        matches!(self, SyncError::Store(AccessStoreError::Persistence(_)))
    }
}

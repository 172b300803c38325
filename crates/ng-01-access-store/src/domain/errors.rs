//! Error types for the access store and its persistence.

use thiserror::Error;

/// Errors from a `KeyValueStore` backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

impl KVStoreError {
    pub(crate) fn io(err: impl std::fmt::Display) -> Self {
        Self::IOError {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessStoreError {
    /// Bulk replacement larger than the store; nothing was changed.
    #[error("Access list of {requested} entries exceeds capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    /// Persisted records are unreadable or inconsistent.
    #[error("Persisted access list is corrupt: {0}")]
    CorruptSnapshot(String),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] KVStoreError),
}

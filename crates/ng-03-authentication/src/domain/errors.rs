use ng_02_crypto_gateway::CryptoError;
use shared_bus::BusError;
use shared_types::MessageError;
use thiserror::Error;

/// Failures inside one scan. All of them resolve to DENIED.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    #[error("Identifier protection failed: {0}")]
    Protection(#[from] CryptoError),

    #[error("Authentication record could not be encoded: {0}")]
    Encoding(#[from] MessageError),

    #[error("Authentication record not published: {0}")]
    Publish(#[from] BusError),
}

//! # Crypto Errors

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key is not an RSA public key in PEM, or its modulus is too small.
    #[error("Invalid key material")]
    InvalidKeyMaterial,

    /// Signature is not base64 or not one modulus long.
    #[error("Invalid signature encoding")]
    InvalidSignatureEncoding,

    #[error("Signature verification failed")]
    VerificationFailed,

    #[error("Message carries no signature")]
    MissingSignature,

    #[error("Canonical payload could not be built: {0}")]
    Payload(String),

    #[error("No edge encryption key installed")]
    EncryptionKeyMissing,

    #[error("Identifier encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Identifier decryption failed")]
    DecryptionFailed,
}

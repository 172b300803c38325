//! # Error Types
//!
//! Errors shared across subsystems.

use thiserror::Error;

/// Rejection reasons for identifiers and node names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Identifier is empty")]
    Empty,

    #[error("Identifier too long: {length} bytes, max {max}")]
    TooLong { length: usize, max: usize },

    /// Byte at `position` is outside printable ASCII.
    #[error("Identifier has a non-printable byte at position {position}")]
    InvalidCharacter { position: usize },
}

/// Errors decoding or encoding a wire message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Payload is not the expected JSON shape.
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Failed to encode message: {0}")]
    Encode(String),
}

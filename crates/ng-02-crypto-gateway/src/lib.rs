//! # Crypto Gateway Subsystem (NG-02)
//!
//! Verifies that list updates, revocations and verdicts really come from
//! the edge server, and encrypts identifiers before they leave the node.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): signature checks and RSA-OAEP, no I/O
//! - **Ports Layer** (`ports/`): the `CryptoGatewayApi` used by protocol crates
//! - **Service Layer** (`service.rs`): holds the trusted and encryption keys
//!
//! ## Security Notes
//!
//! - Signatures are RSA PKCS#1 v1.5 with SHA-256, base64 encoded
//! - Keys are PEM (SPKI or PKCS#1) and at least 2048 bits
//! - Verification never panics; every outcome is a `VerificationResult`

pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use domain::encryption::{encrypted_identifier_len, identifier_digest};
pub use domain::entities::VerificationResult;
pub use domain::errors::CryptoError;
pub use ports::inbound::CryptoGatewayApi;
pub use service::CryptoGateway;

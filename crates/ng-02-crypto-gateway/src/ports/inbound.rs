//! # Inbound Ports
//!
//! API the protocol subsystems call to check edge messages and protect
//! identifiers. Signature checks never fail loudly; they return a
//! `VerificationResult` and callers discard anything not `valid`.

use crate::domain::entities::VerificationResult;
use crate::domain::errors::CryptoError;
use shared_types::{AllowAuthenticationMessage, Identifier, KeyRotationList, VerdictBinding};

pub trait CryptoGatewayApi: Send + Sync {
    /// Verify a full access list (ordered JSON array form).
    fn verify_access_list(&self, uids: &[Identifier], signature: &str) -> VerificationResult;

    /// Verify a revocation (raw identifier bytes).
    fn verify_removal(&self, uid: &Identifier, signature: &str) -> VerificationResult;

    /// Verify an edge verdict against the payload `binding` selects. A
    /// verdict without a signature is invalid.
    fn verify_verdict(
        &self,
        verdict: &AllowAuthenticationMessage,
        binding: VerdictBinding,
    ) -> VerificationResult;

    /// Verify a list-with-new-key response.
    fn verify_key_rotation(&self, rotation: &KeyRotationList) -> VerificationResult;

    /// Install a new edge encryption key. Callers verify the carrying
    /// message first.
    fn install_encryption_key(&self, public_key_pem: &str) -> Result<(), CryptoError>;

    fn has_encryption_key(&self) -> bool;

    /// Stand-in for `identifier` in protected mode (hex SHA-256).
    fn identifier_digest(&self, identifier: &Identifier) -> Result<Identifier, CryptoError>;

    /// RSA-OAEP ciphertext of the identifier's digest for the edge server.
    fn encrypt_identifier(&self, identifier: &Identifier) -> Result<Identifier, CryptoError>;
}

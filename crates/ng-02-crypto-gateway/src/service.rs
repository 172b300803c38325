//! # Crypto Gateway Service
//!
//! Holds the edge server's trusted verifying key (fixed for the node's
//! lifetime) and its current encryption key (rotatable).

use crate::domain::encryption::{self, parse_encryption_key};
use crate::domain::entities::VerificationResult;
use crate::domain::errors::CryptoError;
use crate::domain::signature::{parse_verifying_key, verify_signature};
use crate::ports::inbound::CryptoGatewayApi;
use parking_lot::RwLock;
use rsa::pkcs1v15::VerifyingKey;
use rsa::RsaPublicKey;
use sha2::Sha256;
use shared_types::canonical;
use shared_types::{AllowAuthenticationMessage, Identifier, KeyRotationList, VerdictBinding};
use tracing::{debug, info, warn};

pub struct CryptoGateway {
    trusted_key: VerifyingKey<Sha256>,
    encryption_key: RwLock<Option<RsaPublicKey>>,
}

impl CryptoGateway {
    /// Build from the edge server's PEM public key.
    pub fn new(trusted_key_pem: &str) -> Result<Self, CryptoError> {
        Ok(Self::from_keys(parse_verifying_key(trusted_key_pem)?, None))
    }

    #[must_use]
    pub fn from_keys(
        trusted_key: VerifyingKey<Sha256>,
        encryption_key: Option<RsaPublicKey>,
    ) -> Self {
        Self {
            trusted_key,
            encryption_key: RwLock::new(encryption_key),
        }
    }

    /// Add an initial edge encryption key.
    pub fn with_encryption_key(self, public_key_pem: &str) -> Result<Self, CryptoError> {
        let key = parse_encryption_key(public_key_pem)?;
        *self.encryption_key.write() = Some(key);
        Ok(self)
    }

    fn check(&self, payload: &[u8], signature: &str, what: &str) -> VerificationResult {
        let result = verify_signature(&self.trusted_key, payload, signature);
        if let Some(ref e) = result.error {
            warn!("[ng-02] Rejected {} signature: {}", what, e);
        } else {
            debug!("[ng-02] Verified {} signature", what);
        }
        result
    }
}

impl CryptoGatewayApi for CryptoGateway {
    fn verify_access_list(&self, uids: &[Identifier], signature: &str) -> VerificationResult {
        match canonical::access_list_payload(uids) {
            Ok(payload) => self.check(&payload, signature, "access list"),
            Err(e) => VerificationResult::invalid(CryptoError::Payload(e.to_string())),
        }
    }

    fn verify_removal(&self, uid: &Identifier, signature: &str) -> VerificationResult {
        self.check(&canonical::removal_payload(uid), signature, "removal")
    }

    fn verify_verdict(
        &self,
        verdict: &AllowAuthenticationMessage,
        binding: VerdictBinding,
    ) -> VerificationResult {
        let Some(ref signature) = verdict.signature else {
            return VerificationResult::invalid(CryptoError::MissingSignature);
        };
        match canonical::verdict_payload(binding, &verdict.uid, &verdict.node_id, verdict.result) {
            Ok(payload) => self.check(&payload, signature, "verdict"),
            Err(e) => VerificationResult::invalid(CryptoError::Payload(e.to_string())),
        }
    }

    fn verify_key_rotation(&self, rotation: &KeyRotationList) -> VerificationResult {
        match canonical::rotation_payload(&rotation.access_list, &rotation.public_key) {
            Ok(payload) => self.check(&payload, &rotation.signature, "key rotation"),
            Err(e) => VerificationResult::invalid(CryptoError::Payload(e.to_string())),
        }
    }

    fn install_encryption_key(&self, public_key_pem: &str) -> Result<(), CryptoError> {
        let key = parse_encryption_key(public_key_pem)?;
        *self.encryption_key.write() = Some(key);
        info!("[ng-02] 🔑 Edge encryption key rotated");
        Ok(())
    }

    fn has_encryption_key(&self) -> bool {
        self.encryption_key.read().is_some()
    }

    fn identifier_digest(&self, identifier: &Identifier) -> Result<Identifier, CryptoError> {
        encryption::identifier_digest(identifier)
    }

    fn encrypt_identifier(&self, identifier: &Identifier) -> Result<Identifier, CryptoError> {
        let key = self
            .encryption_key
            .read()
            .clone()
            .ok_or(CryptoError::EncryptionKeyMissing)?;
        encryption::encrypt_identifier(&key, identifier)
    }
}

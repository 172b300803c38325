//! # Identifier Encryption (RSA-OAEP)
//!
//! A node never publishes a raw tag identifier when protection is enabled.
//! It publishes a hex digest for correlation and an RSA-OAEP (SHA-256)
//! ciphertext of that digest addressed to the edge server. Output is hex,
//! one modulus long (512 characters for a 2048-bit key).

use super::errors::CryptoError;
use super::signature::parse_public_key;
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use shared_types::Identifier;

const DIGEST_LEN: usize = 32;

/// Hex SHA-256 of an identifier, used as its stand-in in protected mode.
pub fn identifier_digest(identifier: &Identifier) -> Result<Identifier, CryptoError> {
    let digest = Sha256::digest(identifier.as_bytes());
    Identifier::new(hex::encode(digest)).map_err(|e| CryptoError::Payload(e.to_string()))
}

pub fn parse_encryption_key(pem: &str) -> Result<RsaPublicKey, CryptoError> {
    parse_public_key(pem)
}

/// Hex length of an identifier encrypted to `recipient`.
#[must_use]
pub fn encrypted_identifier_len(recipient: &RsaPublicKey) -> usize {
    recipient.size() * 2
}

/// Encrypt the digest of `identifier` to `recipient`.
pub fn encrypt_identifier(
    recipient: &RsaPublicKey,
    identifier: &Identifier,
) -> Result<Identifier, CryptoError> {
    let digest = Sha256::digest(identifier.as_bytes());
    let sealed = recipient
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), digest.as_slice())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    Identifier::new(hex::encode(sealed)).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Recover the identifier digest from an encrypted identifier.
///
/// Edge-side operation; nodes only encrypt.
pub fn decrypt_identifier(
    secret: &RsaPrivateKey,
    encrypted: &Identifier,
) -> Result<[u8; DIGEST_LEN], CryptoError> {
    let raw = hex::decode(encrypted.as_str()).map_err(|_| CryptoError::DecryptionFailed)?;
    let digest = secret
        .decrypt(Oaep::new::<Sha256>(), &raw)
        .map_err(|_| CryptoError::DecryptionFailed)?;
    digest
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::DecryptionFailed)
}

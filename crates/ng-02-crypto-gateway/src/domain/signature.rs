//! # Edge Signature Verification (RSA)
//!
//! Pure domain logic for checking edge-server signatures.
//!
//! - Trusted key: RSA public key in PEM, SPKI (`BEGIN PUBLIC KEY`) or
//!   PKCS#1 (`BEGIN RSA PUBLIC KEY`)
//! - Signature: base64 of a PKCS#1 v1.5 signature, one modulus long
//! - Digest: SHA-256 of the canonical payload bytes

use super::entities::VerificationResult;
use super::errors::CryptoError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use sha2::Sha256;

/// Smallest accepted edge modulus, in bits.
pub const MIN_KEY_BITS: usize = 2048;

/// Parse a PEM RSA public key and reject undersized moduli.
pub fn parse_public_key(pem: &str) -> Result<RsaPublicKey, CryptoError> {
    let pem = pem.trim();
    let key = RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|_| CryptoError::InvalidKeyMaterial)?;
    if key.size() * 8 < MIN_KEY_BITS {
        return Err(CryptoError::InvalidKeyMaterial);
    }
    Ok(key)
}

pub fn parse_verifying_key(pem: &str) -> Result<VerifyingKey<Sha256>, CryptoError> {
    parse_public_key(pem).map(VerifyingKey::new)
}

/// Decode a base64 signature of exactly one modulus length.
pub fn decode_signature(key: &VerifyingKey<Sha256>, encoded: &str) -> Result<Signature, CryptoError> {
    let raw = STANDARD
        .decode(encoded.trim())
        .map_err(|_| CryptoError::InvalidSignatureEncoding)?;
    if raw.len() != key.as_ref().size() {
        return Err(CryptoError::InvalidSignatureEncoding);
    }
    Signature::try_from(raw.as_slice()).map_err(|_| CryptoError::InvalidSignatureEncoding)
}

/// Verify `encoded` over `payload` with `key`.
pub fn verify_signature(key: &VerifyingKey<Sha256>, payload: &[u8], encoded: &str) -> VerificationResult {
    let signature = match decode_signature(key, encoded) {
        Ok(s) => s,
        Err(e) => return VerificationResult::invalid(e),
    };

    match key.verify(payload, &signature) {
        Ok(()) => VerificationResult::valid(),
        Err(_) => VerificationResult::invalid(CryptoError::VerificationFailed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{edge_keypair, foreign_keypair, sign_payload};
    use rsa::pkcs1::EncodeRsaPublicKey;
    use rsa::pkcs8::LineEnding;

    #[test]
    fn test_valid_signature() {
        let (signing, public_pem) = edge_keypair();
        let key = parse_verifying_key(&public_pem).unwrap();
        let sig = sign_payload(&signing, br#"["A", "B"]"#);

        assert!(verify_signature(&key, br#"["A", "B"]"#, &sig).valid);
    }

    #[test]
    fn test_compact_json_does_not_verify() {
        let (signing, public_pem) = edge_keypair();
        let key = parse_verifying_key(&public_pem).unwrap();
        let sig = sign_payload(&signing, br#"["A", "B"]"#);

        assert!(!verify_signature(&key, br#"["A","B"]"#, &sig).valid);
    }

    #[test]
    fn test_tampered_payload_fails() {
        let (signing, public_pem) = edge_keypair();
        let key = parse_verifying_key(&public_pem).unwrap();
        let sig = sign_payload(&signing, br#"["A", "B"]"#);

        let result = verify_signature(&key, br#"["A", "B", "C"]"#, &sig);
        assert!(!result.valid);
        assert_eq!(result.error, Some(CryptoError::VerificationFailed));
    }

    #[test]
    fn test_wrong_key_fails() {
        let (signing, _) = foreign_keypair();
        let (_, edge_pem) = edge_keypair();
        let key = parse_verifying_key(&edge_pem).unwrap();
        let sig = sign_payload(&signing, b"04A1");

        assert!(!verify_signature(&key, b"04A1", &sig).valid);
    }

    #[test]
    fn test_garbage_signature_is_invalid_not_panic() {
        let (_, public_pem) = edge_keypair();
        let key = parse_verifying_key(&public_pem).unwrap();

        let zeros = STANDARD.encode([0u8; 256]);
        for encoded in ["", "not base64!!", "AAAA", zeros.as_str()] {
            let result = verify_signature(&key, b"payload", encoded);
            assert!(!result.valid, "accepted {encoded:?}");
        }
        assert_eq!(
            verify_signature(&key, b"payload", "AAAA").error,
            Some(CryptoError::InvalidSignatureEncoding)
        );
    }

    #[test]
    fn test_pkcs1_pem_accepted() {
        let (signing, _) = edge_keypair();
        let pkcs1 = signing
            .as_ref()
            .to_public_key()
            .to_pkcs1_pem(LineEnding::LF)
            .unwrap();
        assert!(pkcs1.starts_with("-----BEGIN RSA PUBLIC KEY-----"));

        let key = parse_verifying_key(&pkcs1).unwrap();
        let sig = sign_payload(&signing, b"x");
        assert!(verify_signature(&key, b"x", &sig).valid);
    }

    #[test]
    fn test_bad_key_material() {
        assert_eq!(
            parse_public_key("zz").unwrap_err(),
            CryptoError::InvalidKeyMaterial
        );
        assert_eq!(
            parse_public_key("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n")
                .unwrap_err(),
            CryptoError::InvalidKeyMaterial
        );
    }
}

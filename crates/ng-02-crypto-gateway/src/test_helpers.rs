//! Edge-side signing helpers for tests.
//!
//! Enabled for this crate's tests and, through the `test-helpers` feature,
//! for other crates' dev-dependencies. Keys are fixed 2048-bit fixtures
//! under `testdata/`, so tests never pay for RSA key generation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use shared_types::canonical::{self, VerdictBinding};
use shared_types::{
    AllowAuthenticationMessage, Identifier, KeyRotationList, NodeId, RemoveUidMessage,
    SignedAccessList,
};

/// PKCS#1 v1.5 / SHA-256 signer, as the edge server uses.
pub type EdgeSigningKey = SigningKey<Sha256>;

const EDGE_PRIVATE_PEM: &str = include_str!("../testdata/edge_private.pem");
const FOREIGN_PRIVATE_PEM: &str = include_str!("../testdata/foreign_private.pem");
const ENCRYPTION_PRIVATE_PEM: &str = include_str!("../testdata/encryption_private.pem");
const ROTATED_PRIVATE_PEM: &str = include_str!("../testdata/rotated_private.pem");

fn load(pem: &str) -> (RsaPrivateKey, String) {
    let secret = RsaPrivateKey::from_pkcs8_pem(pem).unwrap();
    let public_pem = secret
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .unwrap();
    (secret, public_pem)
}

/// The trusted edge signing key and its SPKI PEM.
pub fn edge_keypair() -> (EdgeSigningKey, String) {
    let (secret, public_pem) = load(EDGE_PRIVATE_PEM);
    (EdgeSigningKey::new(secret), public_pem)
}

/// A well-formed key the gate does not trust.
pub fn foreign_keypair() -> (EdgeSigningKey, String) {
    let (secret, public_pem) = load(FOREIGN_PRIVATE_PEM);
    (EdgeSigningKey::new(secret), public_pem)
}

/// Edge encryption key and its SPKI PEM.
pub fn encryption_keypair() -> (RsaPrivateKey, String) {
    load(ENCRYPTION_PRIVATE_PEM)
}

/// A second encryption key, used as the rotation target.
pub fn rotated_encryption_keypair() -> (RsaPrivateKey, String) {
    load(ROTATED_PRIVATE_PEM)
}

/// Base64 PKCS#1 v1.5 signature over `payload`.
pub fn sign_payload(signing: &EdgeSigningKey, payload: &[u8]) -> String {
    STANDARD.encode(signing.sign(payload).to_bytes())
}

pub fn sign_access_list(signing: &EdgeSigningKey, uids: Vec<Identifier>) -> SignedAccessList {
    let payload = canonical::access_list_payload(&uids).unwrap();
    SignedAccessList {
        signature: sign_payload(signing, &payload),
        uids,
    }
}

pub fn sign_removal(signing: &EdgeSigningKey, uid: Identifier) -> RemoveUidMessage {
    RemoveUidMessage {
        signature: sign_payload(signing, &canonical::removal_payload(&uid)),
        uid,
    }
}

/// Verdict signed the way the deployed edge signs it (identifier only).
pub fn sign_verdict(
    signing: &EdgeSigningKey,
    uid: Identifier,
    node_id: NodeId,
    result: bool,
) -> AllowAuthenticationMessage {
    sign_verdict_with(VerdictBinding::Uid, signing, uid, node_id, result)
}

pub fn sign_verdict_with(
    binding: VerdictBinding,
    signing: &EdgeSigningKey,
    uid: Identifier,
    node_id: NodeId,
    result: bool,
) -> AllowAuthenticationMessage {
    let payload = canonical::verdict_payload(binding, &uid, &node_id, result).unwrap();
    AllowAuthenticationMessage {
        signature: Some(sign_payload(signing, &payload)),
        uid,
        node_id,
        result,
    }
}

pub fn sign_rotation(
    signing: &EdgeSigningKey,
    access_list: Vec<Identifier>,
    public_key: String,
) -> KeyRotationList {
    let payload = canonical::rotation_payload(&access_list, &public_key).unwrap();
    KeyRotationList {
        signature: sign_payload(signing, &payload),
        access_list,
        public_key,
    }
}

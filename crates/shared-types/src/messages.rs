//! # Wire Messages
//!
//! JSON bodies carried on the bus. Field names match what the edge server
//! emits and expects.

use crate::entities::{Identifier, NodeId};
use crate::errors::MessageError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Authentication record published for every scan.
///
/// Exactly one of `uid` / `encrypted_uid` is set, depending on the node's
/// identifier protection mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticateMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_uid: Option<Identifier>,
    pub node_id: NodeId,
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
    /// Decision the node took locally (`false` while asking the edge).
    pub result: bool,
}

/// Edge verdict for an identifier a node could not decide locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowAuthenticationMessage {
    pub uid: Identifier,
    pub node_id: NodeId,
    pub result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// A full access list with the edge signature over its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAccessList {
    pub uids: Vec<Identifier>,
    pub signature: String,
}

/// A response that also rotates the identifier encryption key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRotationList {
    pub access_list: Vec<Identifier>,
    /// PEM of the new edge encryption key.
    pub public_key: String,
    pub signature: String,
}

/// Body of an `/access_list` push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessListPush {
    Signed(SignedAccessList),
    /// Bare JSON array, accepted only when unsigned lists are enabled.
    Unsigned(Vec<Identifier>),
}

/// Body of a `/response_access_list` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessListResponse {
    Signed(SignedAccessList),
    Rotating(KeyRotationList),
}

/// Body of a `/remove_uid` revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveUidMessage {
    pub uid: Identifier,
    pub signature: String,
}

/// Opens a majority vote round on behalf of `node_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityVoteRequest {
    pub node_id: NodeId,
}

/// A peer's local snapshot submitted to an open round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityVoteResponse {
    pub node_id: NodeId,
    pub uids: Vec<Identifier>,
}

/// Decode a bus payload into a message.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, MessageError> {
    serde_json::from_slice(payload).map_err(|e| MessageError::Malformed(e.to_string()))
}

/// Encode a message as compact JSON.
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, MessageError> {
    serde_json::to_vec(message).map_err(|e| MessageError::Encode(e.to_string()))
}

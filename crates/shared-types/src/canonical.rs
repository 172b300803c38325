//! # Canonical Signed Payloads
//!
//! The exact byte strings the edge server signs. The edge serializes with
//! Python's `json.dumps` defaults, so JSON payloads here use `", "` between
//! items and `": "` after keys, in fixed field order.
//!
//! | Message            | Signed bytes                                          |
//! |--------------------|-------------------------------------------------------|
//! | access list        | `["A", "B"]`                                          |
//! | verdict (`Uid`)    | raw identifier bytes                                  |
//! | verdict (`Bound`)  | `{"uid": "A", "node_id": "N", "result": true}`        |
//! | removal            | raw identifier bytes                                  |
//! | key rotation       | `{"access_list": ["A"], "public_key": "-----BEGIN.."}` |

use std::io;
use std::str::FromStr;

use crate::entities::{Identifier, NodeId};
use crate::errors::MessageError;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// What an edge verdict signature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerdictBinding {
    /// Identifier bytes only, as the deployed edge server signs them.
    /// The signature does not cover `node_id` or `result`.
    #[default]
    Uid,
    /// Identifier, node and result together.
    Bound,
}

impl FromStr for VerdictBinding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uid" => Ok(Self::Uid),
            "bound" => Ok(Self::Bound),
            other => Err(format!("unknown verdict binding {other:?}")),
        }
    }
}

/// `json.dumps` item and key separators.
struct EdgeFormatter;

impl Formatter for EdgeFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_edge_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, MessageError> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, EdgeFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| MessageError::Encode(e.to_string()))?;
    Ok(out)
}

#[derive(Serialize)]
struct VerdictBody<'a> {
    uid: &'a Identifier,
    node_id: &'a NodeId,
    result: bool,
}

#[derive(Serialize)]
struct RotationBody<'a> {
    access_list: &'a [Identifier],
    public_key: &'a str,
}

/// Signed bytes of a full access list, order preserved.
pub fn access_list_payload(uids: &[Identifier]) -> Result<Vec<u8>, MessageError> {
    to_edge_json(uids)
}

/// Signed bytes of an edge verdict under `binding`.
pub fn verdict_payload(
    binding: VerdictBinding,
    uid: &Identifier,
    node_id: &NodeId,
    result: bool,
) -> Result<Vec<u8>, MessageError> {
    match binding {
        VerdictBinding::Uid => Ok(uid.as_bytes().to_vec()),
        VerdictBinding::Bound => to_edge_json(&VerdictBody {
            uid,
            node_id,
            result,
        }),
    }
}

/// Signed bytes of a revocation.
#[must_use]
pub fn removal_payload(uid: &Identifier) -> Vec<u8> {
    uid.as_bytes().to_vec()
}

/// Signed bytes of a list-with-key-rotation response.
pub fn rotation_payload(
    access_list: &[Identifier],
    public_key: &str,
) -> Result<Vec<u8>, MessageError> {
    to_edge_json(&RotationBody {
        access_list,
        public_key,
    })
}

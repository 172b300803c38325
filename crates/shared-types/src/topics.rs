//! Bus topic names.
//!
//! Topic strings are fixed by the deployed edge server and must not change.

/// Node → edge: authentication record for every scan.
pub const AUTHENTICATE: &str = "/authenticate";

/// Edge → node: verdict for a record the node could not decide locally.
pub const ALLOW_AUTHENTICATION: &str = "/allow_authentication";

/// Edge → nodes: unsolicited full access-list push.
pub const ACCESS_LIST: &str = "/access_list";

/// Node → edge: request the current access list.
pub const REQUEST_ACCESS_LIST: &str = "/request_access_list";

/// Edge → node: reply to a request, optionally carrying a key rotation.
pub const RESPONSE_ACCESS_LIST: &str = "/response_access_list";

/// Edge → nodes: revoke one identifier.
pub const REMOVE_UID: &str = "/remove_uid";

/// Node → peers: open a majority vote round.
pub const MAJORITY_VOTE: &str = "/device_majority_vote";

/// Peer → node: local snapshot submitted to an open round.
pub const MAJORITY_RESPONSE: &str = "/device_majority_response";

/// Fixed body of a `REQUEST_ACCESS_LIST` message.
pub const REQUEST_UPDATE_PAYLOAD: &[u8] = b"update";

//! Scan state machine types.

/// Where the node is in handling the current scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Idle,
    CheckingLocal,
    CheckingRemote,
    Authorized,
    Denied,
}

/// Final decision for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Authorized,
    Denied,
}

impl Decision {
    #[must_use]
    pub fn is_authorized(self) -> bool {
        matches!(self, Decision::Authorized)
    }
}

/// What `authenticate` did with a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed(Decision),
    /// Another scan was in flight; this one was dropped untouched.
    Ignored,
}

/// What happened to an inbound verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictDisposition {
    /// Matched the pending query and released it with this result.
    Resolved(bool),
    /// No query is waiting.
    NotAwaited,
    /// For another identifier or another node.
    Mismatch,
    /// Missing or invalid edge signature.
    Untrusted,
    /// Payload did not decode.
    Malformed,
}

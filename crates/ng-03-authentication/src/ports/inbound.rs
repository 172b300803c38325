//! # Inbound Ports
//!
//! API the runtime drives: scans from the tag reader and verdicts from the
//! message dispatcher.

use crate::domain::state::{AuthState, ScanOutcome, VerdictDisposition};
use async_trait::async_trait;
use shared_types::{AllowAuthenticationMessage, Identifier};

#[async_trait]
pub trait AuthenticationApi: Send + Sync {
    /// Run one scan to completion, including actuation.
    async fn authenticate(&self, identifier: Identifier) -> ScanOutcome;

    /// Offer an edge verdict to the pending query.
    fn handle_verdict(&self, verdict: AllowAuthenticationMessage) -> VerdictDisposition;

    fn state(&self) -> AuthState;
}

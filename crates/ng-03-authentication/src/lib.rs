//! # NG-03 Authentication
//!
//! Decides ALLOW or DENY for each scanned tag.
//!
//! ```text
//! IDLE ─▶ CHECKING_LOCAL ─hit──────────────────────▶ AUTHORIZED ─▶ IDLE
//!                │
//!                └─miss─▶ CHECKING_REMOTE ─verdict──▶ AUTHORIZED | DENIED ─▶ IDLE
//!                                         └─timeout─▶ DENIED ─▶ IDLE
//! ```
//!
//! - One scan in flight per node; overlapping scans are ignored.
//! - The edge is asked by publishing the authentication record with
//!   `result=false`; only a verdict for this node and this identifier,
//!   signed by the edge, can resolve the wait.
//! - The relay and LEDs are driven only after the decision is final.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::config::{AuthenticationConfig, IdentifierProtection};
pub use domain::errors::AuthenticationError;
pub use domain::pending::PendingEdgeQuery;
pub use domain::state::{AuthState, Decision, ScanOutcome, VerdictDisposition};
pub use ports::inbound::AuthenticationApi;
pub use service::{AuthenticationDependencies, AuthenticationService};

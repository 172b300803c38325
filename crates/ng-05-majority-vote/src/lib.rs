//! # NG-05 Majority Vote
//!
//! Fallback reconciliation among peer nodes when the edge server cannot
//! provide the access list.
//!
//! ```text
//! IDLE ─▶ SOLICITING ─(ballot full | window elapsed)─▶ TALLYING ─▶ APPLIED | UNCHANGED ─▶ IDLE
//! ```
//!
//! - The originator broadcasts `{node_id}` on `/device_majority_vote`.
//! - Every other node answers `{node_id, uids}` on `/device_majority_response`.
//! - At most `max_participants` peer snapshots are collected per round.
//! - The most frequent whole list wins if it reaches
//!   `floor(participants / 2) + 1`, counting the local snapshot.
//!
//! ## Trust model
//!
//! Snapshots are not signed. Every participant's self-report counts the
//! same, so the vote does not defend against a malicious or stale peer
//! beyond the numeric threshold.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::ballot::{Ballot, SubmitOutcome};
pub use domain::config::MajorityVoteConfig;
pub use domain::errors::VoteError;
pub use domain::state::{ResponseDisposition, RoundOutcome, VoteState};
pub use domain::tally::{tally, TallyResult};
pub use ports::inbound::MajorityVoteApi;
pub use service::{MajorityVoteDependencies, MajorityVoteService};

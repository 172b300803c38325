//! # Subsystem Wiring
//!
//! Routes inbound bus traffic to the owning service.
//!
//! ```text
//!                         ┌──────────────────────┐
//!   /allow_authentication │                      │──▶ ng-03 handle_verdict
//!   /access_list          │                      │──▶ ng-04 handle_push
//!   /response_access_list │  InboundDispatcher   │──▶ ng-04 handle_response
//!   /remove_uid           │                      │──▶ ng-04 handle_removal
//!   /device_majority_vote │                      │──▶ ng-05 handle_request
//!   /device_majority_resp │                      │──▶ ng-05 handle_response
//!                         └──────────────────────┘
//! ```

pub mod dispatcher;

pub use dispatcher::{InboundDispatcher, INBOUND_TOPICS};

//! # NG-04 Access List Sync
//!
//! Keeps the local access list in step with the edge server.
//!
//! ## Flows
//!
//! ```text
//! boot / operator ─▶ request_update ─publish "update"─▶ /request_access_list
//!                        │
//!                        ├─ /response_access_list within window ─▶ Updated
//!                        └─ timeout | disconnected ─▶ load persisted ─▶ majority vote ─▶ FellBack
//!
//! /access_list          ─▶ verify list signature ─▶ replace_all + persist
//! /response_access_list ─▶ verify (list | rotation) ─▶ replace_all + persist [+ rotate key]
//! /remove_uid           ─▶ verify removal signature ─▶ remove + persist
//! ```
//!
//! An update that fails verification or decoding leaves the store untouched.

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use config::SyncConfig;
pub use domain::outcome::{SyncOutcome, UpdateApplied};
pub use domain::waiter::UpdateWaiter;
pub use error::SyncError;
pub use ports::inbound::AccessListSyncApi;
pub use ports::outbound::{MajorityVoteTrigger, ReconcileResult};
pub use service::{AccessListSyncService, SyncDependencies};

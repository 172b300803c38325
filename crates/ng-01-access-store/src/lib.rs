//! # NG-01 Access Store
//!
//! The node's local list of authorized identifiers.
//!
//! ## Behavior
//!
//! - Bounded to `capacity` entries (100 by default), insertion ordered.
//! - Single inserts evict the oldest entry once full.
//! - Bulk replacement is all-or-nothing and never exceeds capacity.
//! - Snapshots persist through a `KeyValueStore` port as a count plus one
//!   record per position, written in one atomic batch.
//!
//! ## Layout
//!
//! ```text
//! domain/    AccessStore (pure ring buffer), StorageLayout (record codec)
//! ports/     KeyValueStore outbound port
//! adapters/  in-memory and file-backed stores
//! service    AccessListRepository (shared, lock-guarded, persisted)
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FileBackedKVStore, InMemoryKVStore};
pub use domain::errors::{AccessStoreError, KVStoreError};
pub use domain::layout::StorageLayout;
pub use domain::store::{AccessStore, DEFAULT_CAPACITY};
pub use ports::outbound::{BatchOperation, KeyValueStore};
pub use service::AccessListRepository;

//! # Runtime Adapters
//!
//! Port implementations that only make sense inside the node binary:
//! board hardware, the tag reader, storage selection and the bridge from
//! sync to the majority vote.

pub mod hardware;
pub mod majority_vote;
pub mod storage;
pub mod tag_reader;

pub use hardware::{LoggingIndicator, LoggingLockActuator};
pub use majority_vote::MajorityVoteAdapter;
pub use storage::open_persistence;
pub use tag_reader::{LineTagReader, TagReader};

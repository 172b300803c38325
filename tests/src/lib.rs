//! # NexxGate Test Suite
//!
//! Cross-crate flows that need several gates, or a gate and a scripted
//! edge server, on one bus.
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs      # Edge-driven flows: boot sync, scans, revocation
//!     └── peers.rs      # Offline fallback and peer majority vote
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ng-tests
//! cargo test -p ng-tests integration::peers::
//! ```

pub mod integration;

//! # Shared Types Crate
//!
//! Domain entities and wire messages exchanged between a gate node, its
//! edge server and its peers.
//!
//! ## Design Principles
//!
//! - **Validated identifiers**: `Identifier` and `NodeId` can only be built
//!   through their checked constructors, including on deserialization.
//! - **Canonical payloads**: every signed message has exactly one byte
//!   representation, produced by the `canonical` module.
//! - **Hardware behind ports**: LEDs, relay and clock are traits so the
//!   protocol crates never touch a device directly.

pub mod canonical;
pub mod entities;
pub mod errors;
pub mod flight;
pub mod hardware;
pub mod messages;
pub mod topics;

pub use canonical::VerdictBinding;
pub use entities::*;
pub use errors::*;
pub use flight::{FlightGuard, SingleFlight};
pub use hardware::{
    Clock, Indicator, IndicatorLed, LockActuator, NullIndicator, NullLockActuator, SystemClock,
    WaitIndicator,
};
pub use messages::*;

//! # Node Runtime Library
//!
//! Exposes the runtime's modules for the binary and the integration tests.
//!
//! - `container/` - configuration and subsystem construction
//! - `adapters/` - hardware, tag reader, storage and vote bridge
//! - `wiring/` - inbound message routing
//! - `handlers/` - scan loop
//! - `runtime` - startup and shutdown

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod runtime;
pub mod wiring;

pub use container::{load_config, ConfigError, ContainerError, GateConfig, GateContainer, GateHardware};
pub use runtime::GateRuntime;

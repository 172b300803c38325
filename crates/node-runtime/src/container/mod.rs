//! # Subsystem Container
//!
//! Central container holding the gate's subsystem instances with their
//! ports wired to concrete adapters.

pub mod config;
pub mod subsystems;

pub use config::{load_config, ConfigError, GateConfig};
pub use subsystems::{ContainerError, GateContainer, GateHardware};

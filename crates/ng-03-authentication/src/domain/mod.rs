pub mod config;
pub mod errors;
pub mod pending;
pub mod state;

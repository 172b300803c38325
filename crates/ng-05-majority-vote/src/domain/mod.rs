pub mod ballot;
pub mod config;
pub mod errors;
pub mod state;
pub mod tally;

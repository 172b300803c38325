//! Long-running loops fed by runtime adapters.

pub mod scan;

pub use scan::ScanHandler;

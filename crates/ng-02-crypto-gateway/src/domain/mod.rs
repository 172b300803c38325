pub mod encryption;
pub mod entities;
pub mod errors;
pub mod signature;

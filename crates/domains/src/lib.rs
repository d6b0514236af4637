//! # domains
//!
//! Entities, the error taxonomy and the port traits for the posting service.
//! Nothing in here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;

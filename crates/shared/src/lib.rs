//! # Savegame Shared
//!
//! Record, configuration and error types used across the savegame crates.

pub mod config;
pub mod error;
pub mod model;

// Re-exports
pub use config::*;
pub use error::*;
pub use model::*;

//! Shared foundation for the Reel dialog manager.
//!
//! Defines the typed vocabulary every other crate speaks: slots, user
//! signals, system decisions, configuration, and the top-level error type.

pub mod config;
pub mod error;
pub mod types;

pub use config::ReelConfig;
pub use error::{ReelError, Result};
pub use types::*;

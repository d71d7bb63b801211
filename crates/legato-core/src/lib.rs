//! Legato-core: Shared types, errors, configuration, and unit conversion
//!
//! This crate provides the foundational types used across the Legato workspace.

pub mod clock;
pub mod config;
pub mod errors;
pub mod types;
pub mod units;

pub use clock::*;
pub use config::*;
pub use errors::*;
pub use types::*;

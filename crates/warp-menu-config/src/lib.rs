//! Configuration models and loading for warp menu synthesis.
//!
//! This crate owns the aggregation config schema read from the menu
//! configuration resource on every pass, and the process settings read once
//! from the environment at startup.

mod error;
mod loader;
mod model;
mod settings;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Aggregation config schema models.
pub use model::*;
/// Process settings and their defaults.
pub use settings::*;

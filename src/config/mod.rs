//! Parser configuration for diffhead.
//!
//! This module defines the Config struct that tunes how file headers are
//! decoded. It supports forward-compatible YAML parsing (unknown fields are
//! ignored) and defaults that match git's own behavior.

mod model;
mod operations;


// Re-export public API
pub use model::Config;

//! Core utilities for the Ember rendering runtime.
//!
//! This crate provides foundational types used across the runtime:
//! - Error types and result aliases
//! - Logging initialization
//! - Frame timing
//! - Engine settings

mod error;
mod logging;
mod settings;
mod timer;

pub use error::{Error, Result};
pub use logging::init_logging;
pub use settings::Settings;
pub use timer::Timer;

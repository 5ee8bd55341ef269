//! Utilities
//!
//! Shared helpers used across the engine.

pub mod error;

pub use error::{AppError, AppResult};

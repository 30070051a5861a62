#![forbid(unsafe_code)]

//! Error types for the fallible edges of the tour.
//!
//! Orchestration itself never fails: out-of-range jumps, empty step lists,
//! and unmeasured targets all degrade to no-ops. Only loading configuration
//! and running user `before` hooks can produce errors.

use thiserror::Error;

/// Errors that can occur when loading a [`TourConfig`](crate::TourConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Returned by a step's `before` hook to keep the tour where it is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("step hook failed: {message}")]
pub struct StepHookError {
    pub message: String,
}

impl StepHookError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

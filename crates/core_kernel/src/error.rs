//! Core error types used across the system

use thiserror::Error;
use crate::temporal::TemporalError;

/// Errors in the settings the kernel types are built from
///
/// Raised while assembling a service from configuration, never by user
/// input; form errors stay in their own module enums so they can carry the
/// offending field.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }
}

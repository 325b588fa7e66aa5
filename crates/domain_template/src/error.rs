//! Template domain errors

use std::io;
use thiserror::Error;

/// Errors raised while loading or merging a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template is missing, unreadable or not a document package.
    /// This is a deployment problem, not something the user can fix.
    #[error("Template not found: {name} ({reason})")]
    TemplateNotFound { name: String, reason: String },

    /// An image could not be decoded or embedded, or the document structure
    /// could not be rewritten
    #[error("Render error: {0}")]
    Render(String),

    /// A placeholder had no value and the template runs in strict mode
    #[error("Missing value for placeholder {0}")]
    MissingKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TemplateError {
    pub fn not_found(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        TemplateError::TemplateNotFound {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        TemplateError::Render(message.into())
    }
}

/// Errors raised by the external fixed-layout converter
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to start converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Converter exited with status {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Converter timed out after {secs}s")]
    TimedOut { secs: u64 },

    #[error("Converter finished but {0} was not produced")]
    MissingOutput(String),
}

//! Sales domain errors
//!
//! Input errors carry the name of the form field they came from so the
//! boundary layer can tell the user which field to correct.

use core_kernel::{MoneyError, PortError, QuantityError, TemporalError};
use domain_template::{ConversionError, TemplateError};
use thiserror::Error;

/// Errors that can occur while generating sales documents
#[derive(Debug, Error)]
pub enum SalesError {
    /// A required field was blank
    #[error("Field '{0}' is required")]
    MissingField(String),

    #[error("Field '{field}' is not a valid amount: {source}")]
    MalformedAmount {
        field: String,
        #[source]
        source: MoneyError,
    },

    #[error("Field '{field}' is not a valid date: {source}")]
    InvalidDate {
        field: String,
        #[source]
        source: TemporalError,
    },

    #[error("Field '{field}' is not a valid quantity: {source}")]
    InvalidQuantity {
        field: String,
        #[source]
        source: QuantityError,
    },

    /// Any other field-level rule, such as a malformed e-mail
    #[error("Field '{field}' is invalid: {message}")]
    InvalidField { field: String, message: String },

    #[error("Submission not found: {0}")]
    SubmissionNotFound(String),

    /// The stored submission is not of the expected kind
    #[error("Submission {id} is a {actual}, not a {expected}")]
    WrongKind {
        id: String,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] PortError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SalesError {
    pub fn missing(field: &str) -> Self {
        SalesError::MissingField(field.to_string())
    }

    pub fn amount(field: &str, source: MoneyError) -> Self {
        SalesError::MalformedAmount {
            field: field.to_string(),
            source,
        }
    }

    pub fn date(field: &str, source: TemporalError) -> Self {
        SalesError::InvalidDate {
            field: field.to_string(),
            source,
        }
    }

    pub fn quantity(field: &str, source: QuantityError) -> Self {
        SalesError::InvalidQuantity {
            field: field.to_string(),
            source,
        }
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        SalesError::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Returns true if the user can fix the problem by editing the form
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            SalesError::MissingField(_)
                | SalesError::MalformedAmount { .. }
                | SalesError::InvalidDate { .. }
                | SalesError::InvalidQuantity { .. }
                | SalesError::InvalidField { .. }
        )
    }

    /// Form field the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            SalesError::MissingField(field) => Some(field),
            SalesError::MalformedAmount { field, .. }
            | SalesError::InvalidDate { field, .. }
            | SalesError::InvalidQuantity { field, .. }
            | SalesError::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            SalesError::MissingField(_) => "missing_field",
            SalesError::MalformedAmount { .. } => "malformed_amount",
            SalesError::InvalidDate { .. } => "invalid_date",
            SalesError::InvalidQuantity { .. } => "invalid_quantity",
            SalesError::InvalidField { .. } => "invalid_field",
            SalesError::SubmissionNotFound(_) => "not_found",
            SalesError::WrongKind { .. } => "wrong_kind",
            SalesError::Template(TemplateError::TemplateNotFound { .. }) => "template_not_found",
            SalesError::Template(TemplateError::MissingKey(_)) => "missing_placeholder_value",
            SalesError::Template(_) => "render_error",
            SalesError::Conversion(_) => "conversion_failed",
            SalesError::Ledger(_) => "ledger_error",
            SalesError::Io(_) | SalesError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_distinct() {
        let errors = [
            SalesError::missing("cliente"),
            SalesError::amount("valor", MoneyError::MalformedAmount("x".into())),
            SalesError::date("data_inicio", TemporalError::InvalidDate("x".into())),
            SalesError::quantity("franquia", QuantityError::InvalidQuantity("x".into())),
            SalesError::invalid("email", "not an e-mail address"),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(SalesError::code).collect();
        assert_eq!(codes.len(), errors.len());
        assert!(errors.iter().all(SalesError::is_user_correctable));
    }

    #[test]
    fn test_operational_errors_are_not_user_correctable() {
        let error = SalesError::from(TemplateError::not_found("proposta.docx", "missing"));
        assert!(!error.is_user_correctable());
        assert_eq!(error.code(), "template_not_found");
        assert_eq!(error.field(), None);
    }
}

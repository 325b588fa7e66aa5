//! API error handling
//!
//! Sales errors are presented by kind: input problems the user can correct
//! become 422 with the offending field in `details`, deployment problems
//! become 500 and converter failures 502.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::PortError;
use domain_sales::SalesError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Sales(#[from] SalesError),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ApiError {
    /// Status code and machine-readable error code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ApiError::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ApiError::Sales(e) => (sales_status(e), e.code()),
        }
    }
}

fn sales_status(error: &SalesError) -> StatusCode {
    match error {
        e if e.is_user_correctable() => StatusCode::UNPROCESSABLE_ENTITY,
        SalesError::SubmissionNotFound(_) => StatusCode::NOT_FOUND,
        SalesError::WrongKind { .. } => StatusCode::CONFLICT,
        SalesError::Conversion(_) => StatusCode::BAD_GATEWAY,
        SalesError::Ledger(e) if e.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
        SalesError::Ledger(PortError::NotFound { .. }) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_code();

        if status.is_server_error() {
            error!(error = %self, code = error_type, "Request failed");
        } else {
            warn!(error = %self, code = error_type, "Request rejected");
        }

        let details = match &self {
            ApiError::Sales(e) => e.field().map(|field| vec![format!("field: {}", field)]),
            _ => None,
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::MoneyError;
    use domain_template::{ConversionError, TemplateError};

    #[test]
    fn test_user_errors_are_unprocessable() {
        let error = ApiError::from(SalesError::amount("valor", MoneyError::MalformedAmount("abc".into())));
        assert_eq!(
            error.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "malformed_amount")
        );
    }

    #[test]
    fn test_operational_errors() {
        let missing = ApiError::from(SalesError::from(TemplateError::not_found("proposta.docx", "gone")));
        assert_eq!(
            missing.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "template_not_found")
        );

        let conversion = ApiError::from(SalesError::from(ConversionError::TimedOut { secs: 60 }));
        assert_eq!(
            conversion.status_and_code(),
            (StatusCode::BAD_GATEWAY, "conversion_failed")
        );

        let ledger = ApiError::from(SalesError::from(PortError::connection("down")));
        assert_eq!(ledger.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_not_found() {
        let error = ApiError::from(SalesError::SubmissionNotFound("SUB-1".into()));
        assert_eq!(error.status_and_code(), (StatusCode::NOT_FOUND, "not_found"));
    }
}

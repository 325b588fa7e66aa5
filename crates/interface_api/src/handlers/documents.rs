//! Document generation handlers
//!
//! Both endpoints take a multipart form and answer with the generated file
//! as an attachment.

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};

use domain_sales::GeneratedDocument;

use crate::dto::forms::{read_contract, read_proposal};
use crate::{error::ApiError, AppState};

/// Header carrying the ledger id of the generated submission
pub const SUBMISSION_ID_HEADER: &str = "x-submission-id";
/// `true` when the fixed-layout conversion succeeded
pub const CONVERTED_HEADER: &str = "x-document-converted";

/// Generates a proposal
pub async fn create_proposal(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_proposal(multipart).await?;
    let document = state.service.generate_proposal(&upload.form, upload.image).await?;
    download(document)
}

/// Generates a contract
pub async fn create_contract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_contract(multipart).await?;
    let document = state.service.generate_contract(&form).await?;
    download(document)
}

fn download(document: GeneratedDocument) -> Result<Response, ApiError> {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        document.file_name
    ))
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, document.content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(SUBMISSION_ID_HEADER, document.submission_id.file_stem())
        .header(CONVERTED_HEADER, document.converted.to_string())
        .body(Body::from(document.bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

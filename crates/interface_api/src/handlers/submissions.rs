//! Submission ledger handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use core_kernel::SubmissionId;
use domain_sales::{ContractForm, SubmissionKind, SubmissionRecord};

use crate::dto::submission::{ListQuery, SubmissionDetail, SubmissionSummary};
use crate::{error::ApiError, AppState};

/// Lists recent proposals
pub async fn list_proposals(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SubmissionSummary>>, ApiError> {
    list(&state, SubmissionKind::Proposal, query).await
}

/// Lists recent contracts
pub async fn list_contracts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SubmissionSummary>>, ApiError> {
    list(&state, SubmissionKind::Contract, query).await
}

/// Gets a proposal with its form fields
pub async fn get_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubmissionDetail>, ApiError> {
    let record = proposal(&state, &id).await?;
    Ok(Json(record.into()))
}

/// Deletes a proposal
pub async fn delete_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let record = proposal(&state, &id).await?;
    state.service.delete_submission(record.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Contract form pre-filled from a proposal
pub async fn contract_from_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContractForm>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.contract_prefill(id).await?))
}

async fn list(
    state: &AppState,
    kind: SubmissionKind,
    query: ListQuery,
) -> Result<Json<Vec<SubmissionSummary>>, ApiError> {
    query.validate()?;
    let records = state.service.recent(kind, query.limit).await?;
    Ok(Json(records.into_iter().map(SubmissionSummary::from).collect()))
}

async fn proposal(state: &AppState, raw_id: &str) -> Result<SubmissionRecord, ApiError> {
    let id = parse_id(raw_id)?;
    let record = state.service.submission(id).await?;
    if record.kind != SubmissionKind::Proposal {
        return Err(ApiError::NotFound(format!("Proposal {} not found", id)));
    }
    Ok(record)
}

fn parse_id(raw: &str) -> Result<SubmissionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("'{}' is not a submission id", raw)))
}

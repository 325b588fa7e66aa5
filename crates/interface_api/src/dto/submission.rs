//! Submission DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{DocumentId, SubmissionId};
use domain_sales::{SubmissionKind, SubmissionRecord};

/// Query string of the listing endpoints
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u32>,
}

/// One line of a submission listing
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: SubmissionId,
    pub kind: SubmissionKind,
    pub client_name: String,
    pub document_id: DocumentId,
    pub created_at: DateTime<Utc>,
}

/// A submission with the form fields it was generated from
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub summary: SubmissionSummary,
    pub fields: serde_json::Value,
}

impl From<SubmissionRecord> for SubmissionSummary {
    fn from(record: SubmissionRecord) -> Self {
        Self {
            id: record.id,
            kind: record.kind,
            client_name: record.client_name,
            document_id: record.document_id,
            created_at: record.created_at,
        }
    }
}

impl From<SubmissionRecord> for SubmissionDetail {
    fn from(mut record: SubmissionRecord) -> Self {
        let fields = std::mem::take(&mut record.payload);
        Self {
            summary: record.into(),
            fields,
        }
    }
}

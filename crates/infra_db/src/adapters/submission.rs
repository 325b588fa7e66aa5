//! PostgreSQL Submission Ledger Adapter
//!
//! Bridges the `SubmissionLedger` port and the `SubmissionRepository`:
//! domain records go in as `NewSubmission` rows and come back out of
//! `SubmissionRow`s, with database errors translated to `PortError`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool_from_url, PgSubmissionLedger};
//! use domain_sales::SubmissionLedger;
//! use std::sync::Arc;
//!
//! let pool = create_pool_from_url("postgres://localhost/sales_docs").await?;
//! let ledger: Arc<dyn SubmissionLedger> = Arc::new(PgSubmissionLedger::new(pool));
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, DocumentId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
    SubmissionId,
};
use domain_sales::{SubmissionKind, SubmissionLedger, SubmissionRecord};

use crate::error::DatabaseError;
use crate::repositories::submission::{NewSubmission, SubmissionRepository, SubmissionRow};

const ADAPTER_ID: &str = "postgres-submission-ledger";

/// PostgreSQL-backed implementation of the SubmissionLedger port
#[derive(Debug, Clone)]
pub struct PgSubmissionLedger {
    repository: SubmissionRepository,
}

impl PgSubmissionLedger {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SubmissionRepository::new(pool),
        }
    }

    /// Underlying repository, for queries the port does not expose
    pub fn repository(&self) -> &SubmissionRepository {
        &self.repository
    }
}

impl DomainPort for PgSubmissionLedger {}

#[async_trait]
impl HealthCheckable for PgSubmissionLedger {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.repository.pool())
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl SubmissionLedger for PgSubmissionLedger {
    #[instrument(skip(self, record), fields(submission_id = %record.id, kind = %record.kind))]
    async fn create(&self, record: SubmissionRecord) -> Result<SubmissionId, PortError> {
        let row = self
            .repository
            .insert(record_to_new(record))
            .await
            .map_err(PortError::from)?;

        debug!("Submission stored");
        Ok(SubmissionId::from_uuid(row.submission_id))
    }

    #[instrument(skip(self))]
    async fn list_recent(
        &self,
        kind: SubmissionKind,
        max_age_days: u32,
        limit: u32,
    ) -> Result<Vec<SubmissionRecord>, PortError> {
        let rows = self
            .repository
            .list_recent(kind.as_str(), days(max_age_days), i64::from(limit))
            .await?;

        rows.into_iter().map(row_to_record).collect()
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self, max_age_days: u32) -> Result<u64, PortError> {
        let removed = self.repository.delete_older_than(days(max_age_days)).await?;
        if removed > 0 {
            debug!(removed, "Expired submissions deleted");
        }
        Ok(removed)
    }

    #[instrument(skip(self), fields(submission_id = %id))]
    async fn get_by_id(&self, id: SubmissionId) -> Result<Option<SubmissionRecord>, PortError> {
        self.repository
            .get_by_id(*id.as_uuid())
            .await?
            .map(row_to_record)
            .transpose()
    }

    #[instrument(skip(self), fields(submission_id = %id))]
    async fn delete(&self, id: SubmissionId) -> Result<bool, PortError> {
        Ok(self.repository.delete(*id.as_uuid()).await?)
    }
}

/// `make_interval` takes an int4 day count
fn days(max_age_days: u32) -> i32 {
    i32::try_from(max_age_days).unwrap_or(i32::MAX)
}

fn record_to_new(record: SubmissionRecord) -> NewSubmission {
    NewSubmission {
        submission_id: *record.id.as_uuid(),
        kind: record.kind.as_str().to_string(),
        client_name: record.client_name,
        document_id: *record.document_id.as_uuid(),
        payload: record.payload,
        created_at: record.created_at,
    }
}

fn row_to_record(row: SubmissionRow) -> Result<SubmissionRecord, PortError> {
    let kind = row
        .kind
        .parse::<SubmissionKind>()
        .map_err(|e| PortError::from(DatabaseError::SerializationError(e.to_string())))?;

    Ok(SubmissionRecord {
        id: SubmissionId::from_uuid(row.submission_id),
        kind,
        client_name: row.client_name,
        document_id: DocumentId::from_uuid(row.document_id),
        payload: row.payload,
        created_at: row.created_at,
    })
}

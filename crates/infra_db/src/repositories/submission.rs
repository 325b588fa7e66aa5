//! Submission repository implementation
//!
//! Queries are built at runtime so the crate compiles without a live
//! database or an offline query cache.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

/// A row of the `submissions` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubmissionRow {
    pub submission_id: Uuid,
    pub kind: String,
    pub client_name: String,
    pub document_id: Uuid,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Values for a new submission row
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub submission_id: Uuid,
    pub kind: String,
    pub client_name: String,
    pub document_id: Uuid,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

const SELECT_COLUMNS: &str =
    "SELECT submission_id, kind, client_name, document_id, payload, created_at FROM submissions";

/// Repository for the submission ledger table
#[derive(Debug, Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a submission
    ///
    /// # Errors
    ///
    /// `DuplicateEntry` if the id already exists, `ConstraintViolation` for
    /// an unknown kind.
    pub async fn insert(&self, new: NewSubmission) -> Result<SubmissionRow, DatabaseError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            INSERT INTO submissions (submission_id, kind, client_name, document_id, payload, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING submission_id, kind, client_name, document_id, payload, created_at
            "#,
        )
        .bind(new.submission_id)
        .bind(&new.kind)
        .bind(&new.client_name)
        .bind(new.document_id)
        .bind(&new.payload)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Rows of one kind younger than `max_age_days`, newest first
    pub async fn list_recent(
        &self,
        kind: &str,
        max_age_days: i32,
        limit: i64,
    ) -> Result<Vec<SubmissionRow>, DatabaseError> {
        let sql = format!(
            "{} WHERE kind = $1 AND created_at >= NOW() - make_interval(days => $2) \
             ORDER BY created_at DESC, submission_id DESC LIMIT $3",
            SELECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(kind)
            .bind(max_age_days)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed recent submissions");
        Ok(rows)
    }

    pub async fn delete_older_than(&self, max_age_days: i32) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM submissions WHERE created_at < NOW() - make_interval(days => $1)",
        )
        .bind(max_age_days)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn get_by_id(&self, submission_id: Uuid) -> Result<Option<SubmissionRow>, DatabaseError> {
        let sql = format!("{} WHERE submission_id = $1", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(submission_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Deletes one row; false if nothing matched
    pub async fn delete(&self, submission_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM submissions WHERE submission_id = $1")
            .bind(submission_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Total row count, used by health reporting and tests
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

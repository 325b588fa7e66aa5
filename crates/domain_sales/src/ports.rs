//! Sales Domain Ports
//!
//! The submission ledger stores a record of every generated document.
//!
//! - **PostgreSQL adapter**: `infra_db::PgSubmissionLedger`
//! - **Mock adapter**: in-memory, behind the `mock` feature
//!
//! ```rust,ignore
//! let ledger: Arc<dyn SubmissionLedger> = Arc::new(PgSubmissionLedger::new(pool));
//! let recent = ledger.list_recent(SubmissionKind::Proposal, 30, 50).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, SubmissionId};

use crate::submission::{SubmissionKind, SubmissionRecord};

/// Persistence of submission records
#[async_trait]
pub trait SubmissionLedger: DomainPort + HealthCheckable {
    /// Stores a record and returns its id
    async fn create(&self, record: SubmissionRecord) -> Result<SubmissionId, PortError>;

    /// Records of one kind no older than `max_age_days`, newest first
    async fn list_recent(
        &self,
        kind: SubmissionKind,
        max_age_days: u32,
        limit: u32,
    ) -> Result<Vec<SubmissionRecord>, PortError>;

    /// Removes records older than `max_age_days`; returns how many
    async fn delete_expired(&self, max_age_days: u32) -> Result<u64, PortError>;

    async fn get_by_id(&self, id: SubmissionId) -> Result<Option<SubmissionRecord>, PortError>;

    /// Removes one record; returns false if it did not exist
    async fn delete(&self, id: SubmissionId) -> Result<bool, PortError>;
}

/// Mock implementation for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of SubmissionLedger
    #[derive(Debug, Default, Clone)]
    pub struct MockSubmissionLedger {
        records: Arc<RwLock<HashMap<SubmissionId, SubmissionRecord>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockSubmissionLedger {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with records for testing
        pub async fn with_records(records: Vec<SubmissionRecord>) -> Self {
            let ledger = Self::new();
            for record in records {
                ledger.records.write().await.insert(record.id, record);
            }
            ledger
        }

        /// Makes every later call fail with a connection error
        pub async fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().await = unavailable;
        }

        pub async fn len(&self) -> usize {
            self.records.read().await.len()
        }

        async fn check(&self) -> Result<(), PortError> {
            if *self.unavailable.read().await {
                return Err(PortError::connection("mock ledger unavailable"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockSubmissionLedger {}

    #[async_trait]
    impl HealthCheckable for MockSubmissionLedger {
        async fn health_check(&self) -> HealthCheckResult {
            let down = *self.unavailable.read().await;
            HealthCheckResult {
                adapter_id: "mock-submission-ledger".to_string(),
                status: if down {
                    AdapterHealth::Unhealthy
                } else {
                    AdapterHealth::Healthy
                },
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl SubmissionLedger for MockSubmissionLedger {
        async fn create(&self, record: SubmissionRecord) -> Result<SubmissionId, PortError> {
            self.check().await?;
            let id = record.id;
            let mut records = self.records.write().await;
            if records.contains_key(&id) {
                return Err(PortError::Conflict {
                    message: format!("submission {} exists", id),
                });
            }
            records.insert(id, record);
            Ok(id)
        }

        async fn list_recent(
            &self,
            kind: SubmissionKind,
            max_age_days: u32,
            limit: u32,
        ) -> Result<Vec<SubmissionRecord>, PortError> {
            self.check().await?;
            let now = Utc::now();
            let records = self.records.read().await;
            let mut results: Vec<_> = records
                .values()
                .filter(|r| r.kind == kind && !r.is_expired(max_age_days, now))
                .cloned()
                .collect();
            results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            results.truncate(limit as usize);
            Ok(results)
        }

        async fn delete_expired(&self, max_age_days: u32) -> Result<u64, PortError> {
            self.check().await?;
            let now = Utc::now();
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|_, r| !r.is_expired(max_age_days, now));
            Ok((before - records.len()) as u64)
        }

        async fn get_by_id(&self, id: SubmissionId) -> Result<Option<SubmissionRecord>, PortError> {
            self.check().await?;
            Ok(self.records.read().await.get(&id).cloned())
        }

        async fn delete(&self, id: SubmissionId) -> Result<bool, PortError> {
            self.check().await?;
            Ok(self.records.write().await.remove(&id).is_some())
        }
    }
}

//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the submission ledger using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: `repositories` own the SQL and
//! row types, `adapters` implement the domain ports on top of them.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PgSubmissionLedger};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/sales_docs")).await?;
//! run_migrations(&pool).await?;
//! let ledger = PgSubmissionLedger::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PgSubmissionLedger;
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool, MIGRATOR};
pub use repositories::{NewSubmission, SubmissionRepository, SubmissionRow};

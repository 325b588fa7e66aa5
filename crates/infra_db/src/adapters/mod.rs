//! Database adapters implementing domain ports
//!
//! ```text
//! domain_sales::SubmissionLedger  <-  PgSubmissionLedger  ->  SubmissionRepository
//! ```

pub mod submission;

pub use submission::PgSubmissionLedger;

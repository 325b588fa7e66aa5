//! Repository implementations
//!
//! Repositories encapsulate SQL and map between database rows and plain
//! row structs; the adapters in `crate::adapters` translate those rows into
//! domain records.

pub mod submission;

pub use submission::{NewSubmission, SubmissionRepository, SubmissionRow};

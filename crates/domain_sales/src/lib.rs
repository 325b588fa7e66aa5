//! Sales Workflow Domain
//!
//! Turns raw proposal and contract forms into merged documents:
//!
//! - `proposal` / `contract`: raw forms, validation and merge contexts
//! - `submission`: ledger records, including the stored form payload
//! - `ports`: the `SubmissionLedger` port and its in-memory mock
//! - `service`: the `DocumentService` running merge, conversion and recording
//!
//! A contract can be pre-filled from a stored proposal with
//! [`ContractForm::prefill_from`].

pub mod contract;
pub mod error;
mod fields;
pub mod ports;
pub mod proposal;
pub mod service;
pub mod submission;

pub use contract::{Contract, ContractForm};
pub use error::SalesError;
pub use ports::SubmissionLedger;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockSubmissionLedger;
pub use proposal::{Proposal, ProposalForm};
pub use service::{DocumentService, DocumentSettings, GeneratedDocument, DOCX_CONTENT_TYPE, PDF_CONTENT_TYPE};
pub use submission::{SubmissionKind, SubmissionRecord};

//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! sales document test suite.
//!
//! # Modules
//!
//! - `fixtures`: Raw form values and expected renderings
//! - `builders`: Minimal DOCX templates and images built in memory
//! - `database`: Database test helpers and container management
//! - `assertions`: Assertions over merged DOCX output
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;

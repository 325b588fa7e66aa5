//! Core Kernel - value types and localization for sales documents
//!
//! This crate provides the building blocks used by the template engine and
//! the sales workflow:
//! - Money parsing and formatting in reais with exact decimal arithmetic
//! - Long-form Portuguese numerals ("por extenso")
//! - Strict form dates and their long-form rendering
//! - Whole-number quantities with grouped digits
//! - Typed identifiers and shared port types

pub mod money;
pub mod numerals;
pub mod quantity;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, MoneyError};
pub use quantity::{Quantity, QuantityError};
pub use temporal::{LongFormDate, TemporalError, Timezone};
pub use identifiers::{DocumentId, SubmissionId};
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
pub use error::CoreError;

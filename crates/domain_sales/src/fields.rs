//! Shared raw-field helpers

use core_kernel::{LongFormDate, Money, Quantity};

use crate::error::SalesError;

/// Trimmed value of a required field
pub(crate) fn required<'a>(name: &str, value: &'a str) -> Result<&'a str, SalesError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SalesError::missing(name));
    }
    Ok(trimmed)
}

/// Trimmed value of an optional field, `None` when blank
pub(crate) fn optional(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

pub(crate) fn money(name: &str, value: &str) -> Result<Money, SalesError> {
    Money::parse(required(name, value)?).map_err(|e| SalesError::amount(name, e))
}

pub(crate) fn quantity(name: &str, value: &str) -> Result<Quantity, SalesError> {
    Quantity::parse(required(name, value)?).map_err(|e| SalesError::quantity(name, e))
}

pub(crate) fn date(name: &str, value: &str) -> Result<LongFormDate, SalesError> {
    LongFormDate::parse(required(name, value)?).map_err(|e| SalesError::date(name, e))
}

/// Whole amounts in words with the currency noun, as used in contracts
pub(crate) fn money_words(name: &str, value: &Money) -> Result<String, SalesError> {
    value.to_words().map_err(|e| SalesError::amount(name, e))
}

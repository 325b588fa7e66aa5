//! Whole-number quantities such as page allowances

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::numerals;

/// Thousands separator used when grouping digits
pub const THOUSANDS_SEPARATOR: char = '.';

/// Errors raised when reading a quantity
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Invalid quantity: '{0}' is not a whole number")]
    InvalidQuantity(String),
}

/// A non-negative integer count (e.g. pages in a franchise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Parses digits that may carry `.` thousands separators
    ///
    /// # Errors
    ///
    /// `QuantityError::InvalidQuantity` when anything other than digits
    /// remains after removing separators and whitespace.
    pub fn parse(raw: &str) -> Result<Self, QuantityError> {
        let cleaned: String = raw
            .chars()
            .filter(|c| *c != THOUSANDS_SEPARATOR && !c.is_whitespace())
            .collect();

        if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
            return Err(QuantityError::InvalidQuantity(raw.trim().to_string()));
        }

        cleaned
            .parse::<u64>()
            .map(Self)
            .map_err(|_| QuantityError::InvalidQuantity(raw.trim().to_string()))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Formats with period-separated thousands ("10.000")
    pub fn format_grouped(&self) -> String {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(THOUSANDS_SEPARATOR);
            }
            grouped.push(c);
        }
        grouped
    }

    /// Renders the quantity in long form
    pub fn to_words(&self) -> String {
        numerals::to_words(self.0)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_grouped())
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

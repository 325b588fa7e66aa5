//! Dates as they appear in sales documents
//!
//! Form dates are entered strictly as `DD/MM/YYYY` and rendered in long
//! form ("11 de Fevereiro de 2026"). "Today" is always taken in the
//! organization's timezone, not the server's.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Month names indexed by `month - 1`
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

/// Format of dates typed into forms and printed as short dates
pub const SHORT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Timezone wrapper for the organization's local calendar
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name
    pub fn parse(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(name.to_string()))
    }

    /// Calendar date of a UTC instant in this timezone
    pub fn date_of(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.0).date_naive()
    }

    /// Today's date in this timezone
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::America::Sao_Paulo)
    }
}

/// Errors related to dates
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid date: '{0}' (expected DD/MM/YYYY)")]
    InvalidDate(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// A calendar date with a long-form Portuguese rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LongFormDate(NaiveDate);

impl LongFormDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses the strict `DD/MM/YYYY` form
    ///
    /// Exactly two day digits, two month digits and four year digits are
    /// required, separated by `/`. The date must exist on the calendar.
    ///
    /// # Errors
    ///
    /// `TemporalError::InvalidDate` for any other shape.
    pub fn parse(raw: &str) -> Result<Self, TemporalError> {
        let invalid = || TemporalError::InvalidDate(raw.to_string());
        let raw_trimmed = raw.trim();

        let bytes = raw_trimmed.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes[2] == b'/'
            && bytes[5] == b'/'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
        if !shape_ok {
            return Err(invalid());
        }

        let day: u32 = raw_trimmed[0..2].parse().map_err(|_| invalid())?;
        let month: u32 = raw_trimmed[3..5].parse().map_err(|_| invalid())?;
        let year: i32 = raw_trimmed[6..10].parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Name of the month in Portuguese, capitalized
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.0.month0() as usize]
    }

    /// "{DD} de {Mês} de {YYYY}"
    pub fn to_words(&self) -> String {
        format!(
            "{:02} de {} de {}",
            self.0.day(),
            self.month_name(),
            self.0.year()
        )
    }

    /// "DD/MM/YYYY"
    pub fn to_short(&self) -> String {
        self.0.format(SHORT_DATE_FORMAT).to_string()
    }
}

impl FromStr for LongFormDate {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LongFormDate::parse(s)
    }
}

impl From<NaiveDate> for LongFormDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for LongFormDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_words())
    }
}

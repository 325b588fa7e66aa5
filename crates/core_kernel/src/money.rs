//! Money parsing and formatting in Brazilian reais
//!
//! This module turns the amounts typed into the sales forms ("R$ 1.234,56",
//! "250", "99.90") into exact decimal values and renders them back in the
//! two shapes the documents need: plain digits with a decimal comma, and
//! long-form words ("duzentos reais e cinquenta centavos").
//!
//! Amounts are held as `rust_decimal::Decimal`; nothing here goes through
//! floating point.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::numerals;

/// Currency symbol accepted (and stripped) in raw input
pub const CURRENCY_SYMBOL: &str = "R$";

/// Minor-unit precision of the real
pub const DECIMAL_PLACES: u32 = 2;

const UNIT: (&str, &str) = ("real", "reais");
const SUBUNIT: (&str, &str) = ("centavo", "centavos");

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Malformed amount: '{0}' is not a valid value in reais")]
    MalformedAmount(String),

    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

/// A non-negative amount in reais
///
/// The value is kept exactly as parsed; quantization to centavos happens
/// when the amount is formatted or rendered to words, and is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money {
    amount: Decimal,
}

impl Money {
    /// Creates a Money value, rejecting negative amounts
    ///
    /// # Errors
    ///
    /// `MoneyError::OutOfRange` when the whole reais, after rounding to
    /// centavos, do not fit in a `u64`. Below that bound every amount keeps
    /// exactly two fraction digits.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::MalformedAmount(amount.to_string()));
        }

        let money = Self { amount };
        let quantized = money.quantized();
        if quantized.scale() != DECIMAL_PLACES || u64::try_from(quantized.trunc()).is_err() {
            return Err(MoneyError::OutOfRange(amount.to_string()));
        }
        Ok(money)
    }

    /// Creates Money from an amount in centavos
    pub fn from_minor(centavos: u64) -> Self {
        Self {
            amount: Decimal::from(centavos) / dec!(100),
        }
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self { amount: dec!(0) }
    }

    /// Parses free-form user input
    ///
    /// The currency symbol and all whitespace are removed first. When the
    /// remaining text contains a comma it is read in the Brazilian convention
    /// (`1.234,56`): periods are thousands separators and the comma is the
    /// decimal mark. Otherwise the text must already use a decimal period.
    ///
    /// # Errors
    ///
    /// `MoneyError::MalformedAmount` when the cleaned text is not a plain
    /// non-negative decimal numeral, `MoneyError::OutOfRange` when it is
    /// too large to be an amount in reais.
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        let malformed = || MoneyError::MalformedAmount(raw.trim().to_string());

        let mut cleaned: String = raw
            .replace(CURRENCY_SYMBOL, "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if cleaned.contains(',') {
            cleaned = cleaned.replace('.', "").replacen(',', ".", 1);
        }

        if !is_plain_numeral(&cleaned) {
            return Err(malformed());
        }

        if cleaned.starts_with('.') {
            cleaned.insert(0, '0');
        }
        if cleaned.ends_with('.') {
            cleaned.pop();
        }

        let amount = Decimal::from_str(&cleaned).map_err(|_| malformed())?;
        Self::new(amount)
    }

    /// Returns the amount as parsed
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns the amount rounded to centavos (banker's rounding), always
    /// carrying exactly two fraction digits
    pub fn quantized(&self) -> Decimal {
        let mut rounded = self
            .amount
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(DECIMAL_PLACES);
        rounded
    }

    /// Splits the quantized amount into whole reais and centavos
    ///
    /// # Errors
    ///
    /// `MoneyError::OutOfRange` if the whole part does not fit in a `u64`.
    pub fn split(&self) -> Result<(u64, u64), MoneyError> {
        let quantized = self.quantized();
        let whole = quantized.trunc();
        let centavos = ((quantized - whole) * dec!(100)).trunc();

        let out_of_range = || MoneyError::OutOfRange(quantized.to_string());
        let whole = u64::try_from(whole).map_err(|_| out_of_range())?;
        let centavos = u64::try_from(centavos).map_err(|_| out_of_range())?;
        Ok((whole, centavos))
    }

    /// Formats as `{integer},{centavos}` without thousands grouping
    ///
    /// ```rust
    /// use core_kernel::Money;
    ///
    /// let m = Money::parse("1.234,56").unwrap();
    /// assert_eq!(m.format_plain(), "1234,56");
    /// ```
    pub fn format_plain(&self) -> String {
        self.quantized().to_string().replace('.', ",")
    }

    /// Renders the amount in words with currency nouns
    ///
    /// `200.50` becomes "duzentos reais e cinquenta centavos"; centavos are
    /// omitted when zero.
    pub fn to_words(&self) -> Result<String, MoneyError> {
        let (reais, centavos) = self.split()?;
        let whole = format!("{} {}", numerals::to_words(reais), noun(reais, UNIT));

        if centavos == 0 {
            return Ok(whole);
        }

        Ok(format!(
            "{} {} {} {}",
            whole,
            numerals::CONJUNCTION,
            numerals::to_words(centavos),
            noun(centavos, SUBUNIT)
        ))
    }

    /// Formats as `"{plain} ({words})"`
    ///
    /// Whole amounts show only the bare numeral in the parenthesis
    /// ("250,00 (duzentos e cinquenta)"); amounts with centavos show the full
    /// currency words.
    pub fn format_with_words(&self) -> Result<String, MoneyError> {
        let (reais, centavos) = self.split()?;
        let words = if centavos == 0 {
            numerals::to_words(reais)
        } else {
            self.to_words()?
        };
        Ok(format!("{} ({})", self.format_plain(), words))
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Money::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Decimal {
        money.amount
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", CURRENCY_SYMBOL, self.format_plain())
    }
}

fn noun(count: u64, (singular, plural): (&'static str, &'static str)) -> &'static str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

/// Digits with at most one decimal point and at least one digit
fn is_plain_numeral(s: &str) -> bool {
    let mut digits = 0usize;
    let mut points = 0usize;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brazilian_convention() {
        let m = Money::parse("R$ 1.234,56").unwrap();
        assert_eq!(m.amount(), dec!(1234.56));
    }

    #[test]
    fn test_parse_period_decimal() {
        let m = Money::parse("99.90").unwrap();
        assert_eq!(m.amount(), dec!(99.90));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Money::parse("abc"), Err(MoneyError::MalformedAmount(_))));
        assert!(matches!(Money::parse(""), Err(MoneyError::MalformedAmount(_))));
        assert!(matches!(Money::parse("-10"), Err(MoneyError::MalformedAmount(_))));
        assert!(matches!(Money::parse("1,2,3"), Err(MoneyError::MalformedAmount(_))));
    }

    #[test]
    fn test_parse_rejects_amounts_beyond_range() {
        for raw in [
            "18446744073709551616",
            "18446744073709551615,999",
            "999999999999999999999999999",
            "9999999999999999999999999999",
        ] {
            assert!(
                matches!(Money::parse(raw), Err(MoneyError::OutOfRange(_))),
                "{raw} should be out of range"
            );
        }
    }

    #[test]
    fn test_largest_amount_keeps_two_fraction_digits() {
        let m = Money::parse("18446744073709551615,99").unwrap();
        assert_eq!(m.format_plain(), "18446744073709551615,99");
        assert!(m.split().is_ok());
    }

    #[test]
    fn test_quantize_is_idempotent() {
        let m = Money::parse("10,005").unwrap();
        let once = m.quantized();
        let twice = Money::new(once).unwrap().quantized();
        assert_eq!(once, twice);
        assert_eq!(once.to_string(), "10.00");
    }

    #[test]
    fn test_words_singular() {
        assert_eq!(Money::parse("1").unwrap().to_words().unwrap(), "um real");
        assert_eq!(
            Money::parse("0,01").unwrap().to_words().unwrap(),
            "zero reais e um centavo"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(25000).to_string(), "R$ 250,00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn plain_format_round_trips_through_parser(centavos in 0u64..100_000_000_000u64) {
            let money = Money::from_minor(centavos);
            let reparsed = Money::parse(&money.format_plain()).unwrap();
            prop_assert_eq!(reparsed.quantized(), money.quantized());
        }

        #[test]
        fn split_recombines_to_quantized_amount(centavos in 0u64..100_000_000_000u64) {
            let money = Money::from_minor(centavos);
            let (reais, cents) = money.split().unwrap();
            prop_assert_eq!(reais * 100 + cents, centavos);
        }
    }
}

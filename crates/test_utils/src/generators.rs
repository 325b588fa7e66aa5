//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating raw inputs and domain values
//! that maintain domain invariants.

use chrono::NaiveDate;
use core_kernel::{Money, Quantity};
use proptest::prelude::*;

/// Strategy for amounts in centavos, up to one hundred million reais
pub fn centavos_strategy() -> impl Strategy<Value = u64> {
    0u64..10_000_000_000u64
}

/// Strategy for valid Money values
pub fn money_strategy() -> impl Strategy<Value = Money> {
    centavos_strategy().prop_map(Money::from_minor)
}

/// Strategy for quantities as typed in the franchise field
pub fn quantity_strategy() -> impl Strategy<Value = Quantity> {
    (0u64..100_000_000u64).prop_map(Quantity::new)
}

/// Strategy for integers the numeral renderer must handle
pub fn numeral_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![0u64..1_000u64, 0u64..1_000_000u64, 0u64..1_000_000_000_000u64]
}

/// Groups the digits of `n` with periods (`1234567` -> `1.234.567`)
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Strategy for Brazilian-style amount strings with their centavos value
///
/// Produces inputs such as `1.234,56`, `R$ 10,00` and `42`.
pub fn br_amount_input_strategy() -> impl Strategy<Value = (String, u64)> {
    (0u64..100_000_000u64, 0u64..100u64, any::<bool>(), any::<bool>()).prop_map(
        |(reais, centavos, with_symbol, with_cents)| {
            let centavos = if with_cents { centavos } else { 0 };
            let mut raw = String::new();
            if with_symbol {
                raw.push_str("R$ ");
            }
            raw.push_str(&group_thousands(reais));
            if with_cents {
                raw.push_str(&format!(",{:02}", centavos));
            }
            (raw, reais * 100 + centavos)
        },
    )
}

/// Strategy for valid calendar dates in a realistic range
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100i32, 1u32..=12u32, 1u32..=28u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

/// Strategy for placeholder keys
pub fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z_]{0,15}"
}

/// Strategy for free text values without braces
pub fn text_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.&<>áéíóúçãõ-]{0,40}"
}

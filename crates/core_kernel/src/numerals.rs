//! Long-form Brazilian Portuguese numerals
//!
//! Renders non-negative integers as written-out words ("por extenso"), the
//! form used in contracts next to the digit representation.
//!
//! Numbers are split into base-1000 groups (bilhões, milhões, mil, and the
//! remainder below one thousand). Each group is rendered independently and
//! the groups are joined with spaces, except that a final remainder below 100
//! is attached with the conjunction "e":
//!
//! ```rust
//! use core_kernel::numerals::to_words;
//!
//! assert_eq!(to_words(121), "cento e vinte e um");
//! assert_eq!(to_words(1001), "mil e um");
//! assert_eq!(to_words(2_500_000), "dois milhões quinhentos mil");
//! ```

/// Conjunction used between hundreds, tens, units and the trailing group
pub const CONJUNCTION: &str = "e";

const ZERO: &str = "zero";

const UNITS: [&str; 10] = [
    "", "um", "dois", "três", "quatro", "cinco", "seis", "sete", "oito", "nove",
];

const TEENS: [&str; 10] = [
    "dez", "onze", "doze", "treze", "quatorze", "quinze", "dezesseis", "dezessete", "dezoito",
    "dezenove",
];

const TENS: [&str; 10] = [
    "", "", "vinte", "trinta", "quarenta", "cinquenta", "sessenta", "setenta", "oitenta",
    "noventa",
];

const HUNDREDS: [&str; 10] = [
    "", "cento", "duzentos", "trezentos", "quatrocentos", "quinhentos", "seiscentos",
    "setecentos", "oitocentos", "novecentos",
];

/// Exactly one hundred uses the bare form instead of "cento"
const ONE_HUNDRED: &str = "cem";

const THOUSAND: &str = "mil";
const MILLION: (&str, &str) = ("milhão", "milhões");
const BILLION: (&str, &str) = ("bilhão", "bilhões");

const GROUP: u64 = 1_000;

/// Renders `n` in long form
///
/// Values at or above 10^12 are carried in the billions group, which is
/// itself rendered recursively ("mil bilhões").
pub fn to_words(n: u64) -> String {
    if n == 0 {
        return ZERO.to_string();
    }

    let remainder = n % GROUP;
    let thousands = (n / GROUP) % GROUP;
    let millions = (n / (GROUP * GROUP)) % GROUP;
    let billions = n / (GROUP * GROUP * GROUP);

    let mut parts: Vec<String> = Vec::with_capacity(4);

    if billions > 0 {
        parts.push(scaled(billions, BILLION));
    }
    if millions > 0 {
        parts.push(scaled(millions, MILLION));
    }
    if thousands > 0 {
        parts.push(if thousands == 1 {
            THOUSAND.to_string()
        } else {
            format!("{} {}", to_words(thousands), THOUSAND)
        });
    }

    if remainder == 0 {
        return parts.join(" ");
    }

    let tail = below_thousand(remainder);
    if parts.is_empty() {
        return tail;
    }

    let head = parts.join(" ");
    if remainder < 100 {
        format!("{} {} {}", head, CONJUNCTION, tail)
    } else {
        format!("{} {}", head, tail)
    }
}

/// Renders a million/billion group, singular for exactly one
fn scaled(count: u64, (singular, plural): (&str, &str)) -> String {
    if count == 1 {
        format!("{} {}", UNITS[1], singular)
    } else {
        format!("{} {}", to_words(count), plural)
    }
}

/// Renders a group in `1..=999`
fn below_thousand(n: u64) -> String {
    debug_assert!(n > 0 && n < GROUP);

    if n == 100 {
        return ONE_HUNDRED.to_string();
    }

    let hundreds = (n / 100) as usize;
    let rest = n % 100;

    match (hundreds, rest) {
        (0, _) => below_hundred(rest),
        (h, 0) => HUNDREDS[h].to_string(),
        (h, r) => format!("{} {} {}", HUNDREDS[h], CONJUNCTION, below_hundred(r)),
    }
}

/// Renders a value in `1..=99`
fn below_hundred(n: u64) -> String {
    let n = n as usize;
    match n {
        1..=9 => UNITS[n].to_string(),
        10..=19 => TEENS[n - 10].to_string(),
        _ => {
            let tens = TENS[n / 10];
            match n % 10 {
                0 => tens.to_string(),
                unit => format!("{} {} {}", tens, CONJUNCTION, UNITS[unit]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(to_words(0), "zero");
    }

    #[test]
    fn test_bare_hundred() {
        assert_eq!(to_words(100), "cem");
        assert_eq!(to_words(101), "cento e um");
        assert_eq!(to_words(110), "cento e dez");
    }

    #[test]
    fn test_scale_words() {
        assert_eq!(to_words(1_000), "mil");
        assert_eq!(to_words(2_000), "dois mil");
        assert_eq!(to_words(1_000_000), "um milhão");
        assert_eq!(to_words(3_000_000), "três milhões");
        assert_eq!(to_words(1_000_000_000), "um bilhão");
        assert_eq!(to_words(2_000_000_000), "dois bilhões");
    }

    #[test]
    fn test_trailing_conjunction_only_below_hundred() {
        assert_eq!(to_words(1_001), "mil e um");
        assert_eq!(to_words(1_099), "mil e noventa e nove");
        assert_eq!(to_words(1_100), "mil cem");
        assert_eq!(to_words(1_000_050), "um milhão e cinquenta");
    }
}

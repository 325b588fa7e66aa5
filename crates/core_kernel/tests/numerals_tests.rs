//! Fixture tests for long-form numerals
//!
//! The expected strings here are the reference output used in printed
//! contracts; any change to them is a change to legal documents.

use core_kernel::numerals::to_words;

/// Every value from 1 to 19 comes straight from the unit and teen tables
const ONE_TO_NINETEEN: [(u64, &str); 19] = [
    (1, "um"),
    (2, "dois"),
    (3, "três"),
    (4, "quatro"),
    (5, "cinco"),
    (6, "seis"),
    (7, "sete"),
    (8, "oito"),
    (9, "nove"),
    (10, "dez"),
    (11, "onze"),
    (12, "doze"),
    (13, "treze"),
    (14, "quatorze"),
    (15, "quinze"),
    (16, "dezesseis"),
    (17, "dezessete"),
    (18, "dezoito"),
    (19, "dezenove"),
];

mod tables {
    use super::*;

    #[test]
    fn test_zero_is_literal() {
        assert_eq!(to_words(0), "zero");
    }

    #[test]
    fn test_one_to_nineteen() {
        for (n, expected) in ONE_TO_NINETEEN {
            assert_eq!(to_words(n), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_round_tens() {
        let expected = [
            (20, "vinte"),
            (30, "trinta"),
            (40, "quarenta"),
            (50, "cinquenta"),
            (60, "sessenta"),
            (70, "setenta"),
            (80, "oitenta"),
            (90, "noventa"),
        ];
        for (n, words) in expected {
            assert_eq!(to_words(n), words);
        }
    }

    #[test]
    fn test_round_hundreds() {
        let expected = [
            (100, "cem"),
            (200, "duzentos"),
            (300, "trezentos"),
            (400, "quatrocentos"),
            (500, "quinhentos"),
            (600, "seiscentos"),
            (700, "setecentos"),
            (800, "oitocentos"),
            (900, "novecentos"),
        ];
        for (n, words) in expected {
            assert_eq!(to_words(n), words);
        }
    }
}

mod conjunctions {
    use super::*;

    #[test]
    fn test_tens_and_units() {
        assert_eq!(to_words(21), "vinte e um");
        assert_eq!(to_words(99), "noventa e nove");
    }

    #[test]
    fn test_hundreds_tens_and_units() {
        assert_eq!(to_words(121), "cento e vinte e um");
        assert_eq!(to_words(250), "duzentos e cinquenta");
        assert_eq!(to_words(999), "novecentos e noventa e nove");
    }

    #[test]
    fn test_hundreds_and_teens() {
        assert_eq!(to_words(115), "cento e quinze");
    }

    #[test]
    fn test_thousand_and_small_remainder() {
        assert_eq!(to_words(1001), "mil e um");
        assert_eq!(to_words(2021), "dois mil e vinte e um");
    }

    #[test]
    fn test_thousand_and_remainder_from_one_hundred_uses_space() {
        assert_eq!(to_words(1250), "mil duzentos e cinquenta");
        assert_eq!(to_words(10_500), "dez mil quinhentos");
    }
}

mod scales {
    use super::*;

    #[test]
    fn test_bare_thousand_has_no_leading_one() {
        let words = to_words(1000);
        assert_eq!(words, "mil");
        assert!(!words.starts_with("um"));
    }

    #[test]
    fn test_multiples_of_thousand() {
        assert_eq!(to_words(2000), "dois mil");
        assert_eq!(to_words(100_000), "cem mil");
        assert_eq!(to_words(121_000), "cento e vinte e um mil");
    }

    #[test]
    fn test_millions_and_billions() {
        assert_eq!(to_words(1_000_000), "um milhão");
        assert_eq!(to_words(1_500_000), "um milhão quinhentos mil");
        assert_eq!(to_words(2_000_000), "dois milhões");
        assert_eq!(to_words(1_000_000_000), "um bilhão");
        assert_eq!(
            to_words(999_999_999_999),
            "novecentos e noventa e nove bilhões novecentos e noventa e nove milhões \
             novecentos e noventa e nove mil novecentos e noventa e nove"
        );
    }

    #[test]
    fn test_beyond_billions_folds_into_billion_group() {
        assert_eq!(to_words(1_000_000_000_000), "mil bilhões");
    }
}

//! Label line grammar tests
//!
//! Property tests for the printed sticker manifest line:
//! [code] - quality - colour - type - Nkg - Ngw - Nl - Nw - Ngsm

use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*\[(?P<code>[^\]]+)\]\s*-\s*(?P<quality>[^-]+?)\s*-\s*(?P<colour>[^-]+?)\s*-\s*(?P<ptype>[^-]+?)\s*-\s*(?P<weight>\d+(?:\.\d+)?)\s*kg\s*-\s*(?P<gross>\d+(?:\.\d+)?)\s*gw\s*-\s*(?P<length>\d+(?:\.\d+)?)\s*l\s*-\s*(?P<width>\d+(?:\.\d+)?)\s*w\s*-\s*(?P<gsm>\d+)\s*gsm\s*$",
    )
    .unwrap()
});

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Product codes as minted by the allocator
fn code_strategy() -> impl Strategy<Value = String> {
    "[AB][0-3][0-9][A-Z]{2}[0-9]{3}"
}

/// Descriptive text fields: trimmed words, no dashes or brackets
fn text_field_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,18}[A-Za-z]"
}

/// Weights and dimensions with up to two decimal places
fn measure_strategy() -> impl Strategy<Value = Decimal> {
    (1u32..100_000).prop_map(|n| Decimal::new(n as i64, 2))
}

fn gsm_strategy() -> impl Strategy<Value = u32> {
    40u32..400
}

fn format_line(
    code: &str,
    quality: &str,
    colour: &str,
    ptype: &str,
    weight: Decimal,
    gross: Decimal,
    length: Decimal,
    width: Decimal,
    gsm: u32,
) -> String {
    format!(
        "[{}] - {} - {} - {} - {}kg - {}gw - {}l - {}w - {}gsm",
        code, quality, colour, ptype, weight, gross, length, width, gsm
    )
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_canonical_line_matches() {
        let line = "[A24MY001] - Premium - White - Roll - 45.6kg - 46.0gw - 100.0l - 50.0w - 80gsm";
        let caps = LINE_RE.captures(line).unwrap();
        assert_eq!(&caps["code"], "A24MY001");
        assert_eq!(&caps["gsm"], "80");
    }

    #[test]
    fn test_suffixes_are_case_insensitive() {
        let line = "[A24MY001] - Premium - White - Roll - 45.6KG - 46GW - 100L - 50W - 80GSM";
        assert!(LINE_RE.is_match(line));
    }

    #[test]
    fn test_rejects_truncated_line() {
        let line = "[A24MY001] - Premium - White - Roll - 45.6kg - 46.0gw";
        assert!(!LINE_RE.is_match(line));
    }

    #[test]
    fn test_rejects_unbracketed_code() {
        let line = "A24MY001 - Premium - White - Roll - 45.6kg - 46.0gw - 100l - 50w - 80gsm";
        assert!(!LINE_RE.is_match(line));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Any well-formed field tuple produces a line the grammar accepts,
    /// and every field is recovered exactly
    #[test]
    fn prop_format_then_parse_recovers_fields(
        code in code_strategy(),
        quality in text_field_strategy(),
        colour in text_field_strategy(),
        ptype in text_field_strategy(),
        weight in measure_strategy(),
        gross in measure_strategy(),
        length in measure_strategy(),
        width in measure_strategy(),
        gsm in gsm_strategy(),
    ) {
        let line = format_line(&code, &quality, &colour, &ptype, weight, gross, length, width, gsm);
        let caps = LINE_RE.captures(&line).unwrap();

        prop_assert_eq!(caps["code"].trim(), code.as_str());
        prop_assert_eq!(caps["quality"].trim(), quality.trim());
        prop_assert_eq!(caps["colour"].trim(), colour.trim());
        prop_assert_eq!(caps["ptype"].trim(), ptype.trim());
        prop_assert_eq!(Decimal::from_str(&caps["weight"]).unwrap(), weight);
        prop_assert_eq!(Decimal::from_str(&caps["gross"]).unwrap(), gross);
        prop_assert_eq!(Decimal::from_str(&caps["length"]).unwrap(), length);
        prop_assert_eq!(Decimal::from_str(&caps["width"]).unwrap(), width);
        prop_assert_eq!(caps["gsm"].parse::<u32>().unwrap(), gsm);
    }

    /// Extra interior whitespace around separators never changes the parse
    #[test]
    fn prop_whitespace_tolerant(
        code in code_strategy(),
        quality in text_field_strategy(),
        gsm in gsm_strategy(),
        pad in 0usize..4,
    ) {
        let sep = format!("{}-{}", " ".repeat(pad), " ".repeat(pad));
        let line = format!(
            "[{code}]{sep}{quality}{sep}White{sep}Roll{sep}45.6kg{sep}46gw{sep}100l{sep}50w{sep}{gsm}gsm"
        );
        let caps = LINE_RE.captures(&line).unwrap();
        prop_assert_eq!(caps["quality"].trim(), quality.trim());
        prop_assert_eq!(caps["gsm"].parse::<u32>().unwrap(), gsm);
    }

    /// Dropping the gsm suffix always rejects the line
    #[test]
    fn prop_missing_suffix_rejected(
        code in code_strategy(),
        gsm in gsm_strategy(),
    ) {
        let line = format!(
            "[{code}] - Premium - White - Roll - 45.6kg - 46gw - 100l - 50w - {gsm}"
        );
        prop_assert!(!LINE_RE.is_match(&line));
    }
}

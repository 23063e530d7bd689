//! Label grammar parsing
//!
//! A dispatch manifest line is the printed sticker text:
//!
//! ```text
//! [<code>] - <quality> - <colour> - <type> - <weight>kg - <gross>gw - <length>l - <width>w - <gsm>gsm
//! ```
//!
//! Separators are whitespace-tolerant and unit suffixes case-insensitive;
//! the text fields are trimmed but otherwise preserved verbatim. A line
//! that does not match the grammar fails with `MalformedLabel`, and a batch
//! containing one bad line fails whole: a dispatch is never created from a
//! partially understood manifest.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use shared::models::ScannedItem;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

static LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*\[(?P<code>[^\]]+)\]\s*-\s*(?P<quality>[^-]+?)\s*-\s*(?P<colour>[^-]+?)\s*-\s*(?P<ptype>[^-]+?)\s*-\s*(?P<weight>\d+(?:\.\d+)?)\s*kg\s*-\s*(?P<gross>\d+(?:\.\d+)?)\s*gw\s*-\s*(?P<length>\d+(?:\.\d+)?)\s*l\s*-\s*(?P<width>\d+(?:\.\d+)?)\s*w\s*-\s*(?P<gsm>\d+)\s*gsm\s*$",
    )
    .expect("label grammar regex is valid")
});

/// Parse one manifest line into a ScannedItem
pub fn parse_label(line: &str) -> AppResult<ScannedItem> {
    let caps = LABEL_RE.captures(line).ok_or_else(|| AppError::MalformedLabel {
        line: line.to_string(),
    })?;

    let decimal = |name: &str| -> AppResult<Decimal> {
        let raw = &caps[name];
        Decimal::from_str(raw).map_err(|_| AppError::MalformedLabel {
            line: line.to_string(),
        })
    };

    let gsm: i32 = caps["gsm"].parse().map_err(|_| AppError::MalformedLabel {
        line: line.to_string(),
    })?;

    Ok(ScannedItem {
        product_code: caps["code"].trim().to_string(),
        quality: caps["quality"].trim().to_string(),
        colour: caps["colour"].trim().to_string(),
        product_type: caps["ptype"].trim().to_string(),
        weight_kg: decimal("weight")?,
        gross_weight: decimal("gross")?,
        length: decimal("length")?,
        width: decimal("width")?,
        gsm,
    })
}

/// Parse a whole manifest, failing fast on the first malformed line
pub fn parse_labels(lines: &[String]) -> AppResult<Vec<ScannedItem>> {
    lines.iter().map(|line| parse_label(line)).collect()
}

/// Render a ScannedItem back into its label line. `parse_label` is a left
/// inverse of this for any item with well-formed fields.
pub fn format_label(item: &ScannedItem) -> String {
    format!(
        "[{}] - {} - {} - {} - {}kg - {}gw - {}l - {}w - {}gsm",
        item.product_code,
        item.quality,
        item.colour,
        item.product_type,
        item.weight_kg,
        item.gross_weight,
        item.length,
        item.width,
        item.gsm
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_well_formed_line() {
        let item = parse_label(
            "[A24MY001] - Premium - White - Roll - 45.6kg - 46.0gw - 100.0l - 50.0w - 80gsm",
        )
        .unwrap();

        assert_eq!(item.product_code, "A24MY001");
        assert_eq!(item.quality, "Premium");
        assert_eq!(item.colour, "White");
        assert_eq!(item.product_type, "Roll");
        assert_eq!(item.weight_kg, dec("45.6"));
        assert_eq!(item.gross_weight, dec("46.0"));
        assert_eq!(item.length, dec("100.0"));
        assert_eq!(item.width, dec("50.0"));
        assert_eq!(item.gsm, 80);
    }

    #[test]
    fn test_parse_tolerates_spacing_and_suffix_case() {
        let item = parse_label(
            "  [A24MY001]- Premium -White - Roll -45.6KG - 46GW - 100L - 50W - 80GSM  ",
        )
        .unwrap();
        assert_eq!(item.colour, "White");
        assert_eq!(item.gsm, 80);
    }

    #[test]
    fn test_missing_bracket_rejected() {
        let err = parse_label(
            "A24MY001 - Premium - White - Roll - 45.6kg - 46.0gw - 100.0l - 50.0w - 80gsm",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedLabel { .. }));
    }

    #[test]
    fn test_missing_unit_suffix_rejected() {
        assert!(parse_label(
            "[A24MY001] - Premium - White - Roll - 45.6 - 46.0gw - 100.0l - 50.0w - 80gsm"
        )
        .is_err());
    }

    #[test]
    fn test_non_numeric_weight_rejected() {
        assert!(parse_label(
            "[A24MY001] - Premium - White - Roll - heavykg - 46.0gw - 100.0l - 50.0w - 80gsm"
        )
        .is_err());
    }

    #[test]
    fn test_fractional_gsm_rejected() {
        assert!(parse_label(
            "[A24MY001] - Premium - White - Roll - 45.6kg - 46.0gw - 100.0l - 50.0w - 80.5gsm"
        )
        .is_err());
    }

    #[test]
    fn test_batch_fails_fast_on_one_bad_line() {
        let lines = vec![
            "[A24MY001] - Premium - White - Roll - 45.6kg - 46.0gw - 100.0l - 50.0w - 80gsm"
                .to_string(),
            "not a label".to_string(),
        ];
        let err = parse_labels(&lines).unwrap_err();
        assert!(matches!(err, AppError::MalformedLabel { line } if line == "not a label"));
    }

    #[test]
    fn test_format_then_parse_round_trip() {
        let item = ScannedItem {
            product_code: "B03JY042".to_string(),
            quality: "Second Grade".to_string(),
            colour: "Off White".to_string(),
            product_type: "Sheet".to_string(),
            weight_kg: dec("12.4"),
            gross_weight: dec("13.0"),
            length: dec("80.25"),
            width: dec("42.0"),
            gsm: 120,
        };
        assert_eq!(parse_label(&format_label(&item)).unwrap(), item);
    }
}

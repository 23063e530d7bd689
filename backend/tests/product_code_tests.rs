//! Product code grammar tests
//!
//! Property tests for the sticker product code format:
//! shift letter + 2-digit day + month first/last letter + 3-digit serial

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn month_code(month: u32) -> String {
    let name = MONTH_NAMES[(month - 1) as usize];
    let first = &name[..1];
    let last = &name[name.len() - 1..];
    format!("{}{}", first.to_uppercase(), last.to_uppercase())
}

fn encode(shift: char, date: NaiveDate, serial: u32) -> String {
    format!(
        "{}{:02}{}{:03}",
        shift,
        date.day(),
        month_code(date.month()),
        serial
    )
}

// ============================================================================
// Property Test Strategies
// ============================================================================

fn shift_strategy() -> impl Strategy<Value = char> {
    prop_oneof![Just('A'), Just('B')]
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2023i32..2027, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    })
}

fn serial_strategy() -> impl Strategy<Value = u32> {
    1u32..=999
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Known-good codes from the sticker format
    #[test]
    fn test_known_codes() {
        let day_shift = encode('A', NaiveDate::from_ymd_opt(2026, 5, 24).unwrap(), 1);
        assert_eq!(day_shift, "A24MY001");

        let night_shift = encode('B', NaiveDate::from_ymd_opt(2026, 7, 3).unwrap(), 42);
        assert_eq!(night_shift, "B03JY042");
    }

    /// January and July share the JY month code; the day component keeps
    /// codes within a month unique, not across months
    #[test]
    fn test_month_code_collisions() {
        assert_eq!(month_code(1), month_code(7));
        assert_eq!(month_code(1), "JY");
        assert_eq!(month_code(5), "MY");
        assert_eq!(month_code(2), "FY");
        assert_eq!(month_code(9), "SR");
    }

    /// The serial wraps to 1 after 999 rather than growing a fourth digit
    #[test]
    fn test_serial_successor_wraps() {
        let next = |max: Option<u32>| match max {
            None => 1,
            Some(m) if m >= 999 => 1,
            Some(m) => m + 1,
        };

        assert_eq!(next(None), 1);
        assert_eq!(next(Some(1)), 2);
        assert_eq!(next(Some(998)), 999);
        assert_eq!(next(Some(999)), 1);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Every generated code has the fixed 8-character shape
    #[test]
    fn prop_code_shape(shift in shift_strategy(), date in date_strategy(), serial in serial_strategy()) {
        let code = encode(shift, date, serial);

        prop_assert_eq!(code.len(), 8);
        let bytes = code.as_bytes();
        prop_assert!(bytes[0] == b'A' || bytes[0] == b'B');
        prop_assert!(bytes[1].is_ascii_digit() && bytes[2].is_ascii_digit());
        prop_assert!(bytes[3].is_ascii_uppercase() && bytes[4].is_ascii_uppercase());
        prop_assert!(bytes[5..].iter().all(u8::is_ascii_digit));
    }

    /// The trailing three digits recover the serial
    #[test]
    fn prop_serial_recoverable(shift in shift_strategy(), date in date_strategy(), serial in serial_strategy()) {
        let code = encode(shift, date, serial);
        let recovered: u32 = code[5..].parse().unwrap();
        prop_assert_eq!(recovered, serial);
    }

    /// The day component round-trips through the code
    #[test]
    fn prop_day_recoverable(shift in shift_strategy(), date in date_strategy(), serial in serial_strategy()) {
        let code = encode(shift, date, serial);
        let day: u32 = code[1..3].parse().unwrap();
        prop_assert_eq!(day, date.day());
    }

    /// Distinct serials in the same scope yield distinct codes
    #[test]
    fn prop_distinct_serials_distinct_codes(
        shift in shift_strategy(),
        date in date_strategy(),
        a in serial_strategy(),
        b in serial_strategy(),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(encode(shift, date, a), encode(shift, date, b));
    }

    /// Day and night shifts never collide on the same date and serial
    #[test]
    fn prop_shifts_never_collide(date in date_strategy(), serial in serial_strategy()) {
        prop_assert_ne!(encode('A', date, serial), encode('B', date, serial));
    }
}

//! Dispatch aggregation tests
//!
//! Property tests for manifest totals and the colour -> quality -> type
//! summary hierarchy.

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use shared::models::ScannedItem;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ============================================================================
// Property Test Strategies
// ============================================================================

fn small_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("White".to_string()),
        Just("Off White".to_string()),
        Just("Blue".to_string()),
        Just("Premium".to_string()),
        Just("Second".to_string()),
        Just("Roll".to_string()),
        Just("Sheet".to_string()),
    ]
}

fn item_strategy() -> impl Strategy<Value = ScannedItem> {
    (
        "[AB][0-3][0-9][A-Z]{2}[0-9]{3}",
        small_text_strategy(),
        small_text_strategy(),
        small_text_strategy(),
        1u32..100_000,
        40i32..400,
    )
        .prop_map(|(code, quality, colour, ptype, centi_kg, gsm)| {
            let weight = Decimal::new(centi_kg as i64, 2);
            ScannedItem {
                product_code: code,
                quality,
                colour,
                product_type: ptype,
                weight_kg: weight,
                gross_weight: weight + dec("0.40"),
                length: dec("100.0"),
                width: dec("50.0"),
                gsm,
            }
        })
}

fn manifest_strategy() -> impl Strategy<Value = Vec<ScannedItem>> {
    prop::collection::vec(item_strategy(), 1..20)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Midpoint sums round away from zero at 2 decimal places
    #[test]
    fn test_rounding_strategy() {
        assert_eq!(round2(dec("58.005")), dec("58.01"));
        assert_eq!(round2(dec("58.004")), dec("58.00"));
        assert_eq!(round2(dec("57.995")), dec("58.00"));
    }

    /// Two items of the same (colour, quality, type) merge into one line
    #[test]
    fn test_same_leaf_weights_merge() {
        let weights = [dec("28.5"), dec("29.5")];
        let total: Decimal = weights.iter().copied().sum();
        assert_eq!(round2(total), dec("58.00"));
    }

    /// Grouping keys are compared verbatim; case differences split leaves
    #[test]
    fn test_case_sensitive_keys() {
        let keys = ["White", "white"];
        assert_ne!(keys[0], keys[1]);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

/// Totals computed the way the dispatch manifest computes them
fn totals(items: &[ScannedItem]) -> (i32, Decimal) {
    let weight: Decimal = items.iter().map(|i| i.weight_kg).sum();
    (items.len() as i32, round2(weight))
}

proptest! {
    /// Total weight and item count are invariant under manifest ordering
    #[test]
    fn prop_totals_permutation_invariant(mut items in manifest_strategy()) {
        let (count, weight) = totals(&items);
        items.reverse();
        let (rev_count, rev_weight) = totals(&items);

        prop_assert_eq!(count, rev_count);
        prop_assert_eq!(weight, rev_weight);
    }

    /// The item count always equals the manifest length
    #[test]
    fn prop_count_matches_length(items in manifest_strategy()) {
        let (count, _) = totals(&items);
        prop_assert_eq!(count as usize, items.len());
    }

    /// Per-leaf weight sums partition the manifest total: summing every
    /// unrounded leaf reproduces the unrounded grand total
    #[test]
    fn prop_leaf_sums_partition_total(items in manifest_strategy()) {
        use std::collections::BTreeMap;

        let mut leaves: BTreeMap<(String, String, String), Decimal> = BTreeMap::new();
        for item in &items {
            let key = (
                item.colour.clone(),
                item.quality.clone(),
                item.product_type.clone(),
            );
            *leaves.entry(key).or_insert(Decimal::ZERO) += item.weight_kg;
        }

        let leaf_total: Decimal = leaves.values().copied().sum();
        let grand_total: Decimal = items.iter().map(|i| i.weight_kg).sum();
        prop_assert_eq!(leaf_total, grand_total);
    }

    /// Splitting a manifest in two and totalling each half never changes
    /// the combined unrounded weight
    #[test]
    fn prop_totals_additive(items in manifest_strategy(), split in 0usize..20) {
        let split = split.min(items.len());
        let (left, right) = items.split_at(split);

        let left_sum: Decimal = left.iter().map(|i| i.weight_kg).sum();
        let right_sum: Decimal = right.iter().map(|i| i.weight_kg).sum();
        let all_sum: Decimal = items.iter().map(|i| i.weight_kg).sum();

        prop_assert_eq!(left_sum + right_sum, all_sum);
    }

    /// Rounding at the end is within half a cent of the exact sum
    #[test]
    fn prop_rounding_error_bounded(items in manifest_strategy()) {
        let exact: Decimal = items.iter().map(|i| i.weight_kg).sum();
        let rounded = round2(exact);
        let diff = (exact - rounded).abs();
        prop_assert!(diff <= dec("0.005"));
    }
}

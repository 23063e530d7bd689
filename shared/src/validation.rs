//! Validation utilities for the Fabric Roll Tracking Platform

use rust_decimal::Decimal;

/// Validate that every physical measurement on a unit is non-negative
pub fn validate_measurements(
    net_weight: Decimal,
    gross_weight: Decimal,
    length: Decimal,
    width: Decimal,
    gsm: i32,
) -> Result<(), &'static str> {
    if net_weight < Decimal::ZERO {
        return Err("Net weight cannot be negative");
    }
    if gross_weight < Decimal::ZERO {
        return Err("Gross weight cannot be negative");
    }
    if length < Decimal::ZERO {
        return Err("Length cannot be negative");
    }
    if width < Decimal::ZERO {
        return Err("Width cannot be negative");
    }
    if gsm < 0 {
        return Err("Grams per square metre cannot be negative");
    }
    Ok(())
}

/// Validate a reference-data item name (1-100 characters after trimming)
pub fn validate_ref_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.len() > 100 {
        return Err("Name cannot exceed 100 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_valid_measurements() {
        assert!(validate_measurements(dec("45.6"), dec("46.0"), dec("100.0"), dec("50.0"), 80).is_ok());
        assert!(validate_measurements(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, 0).is_ok());
    }

    /// Zero gsm is accepted here and by the inventory_units CHECK; the two
    /// layers must agree so a zero never turns into a database error
    #[test]
    fn test_zero_gsm_accepted() {
        assert!(validate_measurements(dec("45.6"), dec("46.0"), dec("100.0"), dec("50.0"), 0).is_ok());
    }

    #[test]
    fn test_negative_measurements_rejected() {
        assert!(validate_measurements(dec("-1"), dec("46.0"), dec("100.0"), dec("50.0"), 80).is_err());
        assert!(validate_measurements(dec("45.6"), dec("46.0"), dec("100.0"), dec("50.0"), -80).is_err());
    }

    #[test]
    fn test_ref_name() {
        assert!(validate_ref_name("Premium").is_ok());
        assert!(validate_ref_name("  ").is_err());
        assert!(validate_ref_name(&"x".repeat(101)).is_err());
    }
}

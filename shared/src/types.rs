//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Production shift a unit was produced in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    /// 8AM-8PM
    Day,
    /// 8PM-8AM
    Night,
}

impl Shift {
    /// Single-letter code embedded in product codes
    pub fn code(&self) -> char {
        match self {
            Shift::Day => 'A',
            Shift::Night => 'B',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Day => "day",
            Shift::Night => "night",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "day" => Some(Shift::Day),
            "night" => Some(Shift::Night),
            _ => None,
        }
    }
}

/// Trading name the unit is produced under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradingName {
    Bharat,
    Green,
}

impl TradingName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingName::Bharat => "bharat",
            TradingName::Green => "green",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "bharat" => Some(TradingName::Bharat),
            "green" => Some(TradingName::Green),
            _ => None,
        }
    }
}

/// User roles on the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    StickerOperator,
    DispatchOperator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::StickerOperator => "sticker_operator",
            UserRole::DispatchOperator => "dispatch_operator",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "sticker_operator" => Some(UserRole::StickerOperator),
            "dispatch_operator" => Some(UserRole::DispatchOperator),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_codes() {
        assert_eq!(Shift::Day.code(), 'A');
        assert_eq!(Shift::Night.code(), 'B');
    }

    #[test]
    fn test_shift_round_trip() {
        for shift in [Shift::Day, Shift::Night] {
            assert_eq!(Shift::from_str(shift.as_str()), Some(shift));
        }
        assert_eq!(Shift::from_str("afternoon"), None);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::Admin,
            UserRole::StickerOperator,
            UserRole::DispatchOperator,
        ] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
    }
}

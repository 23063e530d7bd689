//! Dispatch manifest models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One parsed label line from a dispatch manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedItem {
    pub product_code: String,
    pub quality: String,
    pub colour: String,
    pub product_type: String,
    pub weight_kg: Decimal,
    pub gross_weight: Decimal,
    pub length: Decimal,
    pub width: Decimal,
    pub gsm: i32,
}

/// Per-(colour, quality, type) leaf of a dispatch summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub product_type: String,
    pub pieces: u32,
    pub total_weight_kg: Decimal,
}

/// All product types of one quality within a colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityGroup {
    pub quality: String,
    pub lines: Vec<SummaryLine>,
}

/// All qualities of one colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColourGroup {
    pub colour: String,
    pub qualities: Vec<QualityGroup>,
}

/// Hierarchical dispatch summary: colour -> quality -> product type.
///
/// Groups appear in insertion order of first occurrence, which is stable
/// for a fixed input order. No sorting or case normalization is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub colours: Vec<ColourGroup>,
}

/// An immutable shipment manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub id: Uuid,
    pub client: String,
    pub vehicle_number: String,
    pub driver_contact: String,
    pub scanned_items: Vec<ScannedItem>,
    pub summary: DispatchSummary,
    pub total_items: i32,
    pub total_weight: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

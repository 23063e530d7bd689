//! Inventory unit models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Shift, TradingName};

/// One physical produced roll/sheet of material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryUnit {
    pub id: Uuid,
    /// Unique human-readable product code, immutable once assigned
    pub product_number: String,
    pub quality_id: i32,
    pub colour_id: i32,
    pub product_type_id: i32,
    pub storage_location_id: i32,
    pub trading_name: TradingName,
    pub shift: Shift,
    pub production_date: NaiveDate,
    /// 3-digit serial scoped to (shift, production_date)
    pub serial_number: String,
    pub gsm: i32,
    pub net_weight: Decimal,
    pub gross_weight: Decimal,
    pub length: Decimal,
    pub width: Decimal,
    pub is_sold: bool,
    pub laminated: bool,
    /// Canonical payload string rendered into the machine-scannable code
    pub qr_code_data: Option<String>,
    pub qr_code_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
}

/// Joined inventory listing row (code, type, weight, colour, quality)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_code: String,
    pub product_type: String,
    pub weight: Decimal,
    pub colour: String,
    pub quality: String,
}

//! Scan staging models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of an operator's personal scan worklist.
///
/// At most one row exists per (operator, product code); re-scanning the
/// same code is a no-op. Rows live between a scan and the operator's next
/// dispatch, which clears the worklist. The snapshot columns are captured
/// at scan time and are not kept in sync with the inventory row, which may
/// be consumed underneath a stale entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStagingEntry {
    pub id: Uuid,
    pub operator_id: Uuid,
    pub product_code: String,
    pub product_type: String,
    pub quality: String,
    pub colour: String,
    pub net_weight: Decimal,
    pub gross_weight: Decimal,
    pub created_at: DateTime<Utc>,
}

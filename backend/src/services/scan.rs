//! Scan staging service
//!
//! An operator scans sticker codes into a personal worklist ahead of a
//! dispatch. The worklist row keeps a snapshot of the unit's descriptive
//! fields taken at scan time; the reference to the inventory unit is
//! best-effort and resolved again at dispatch time, because a unit can be
//! consumed by another dispatch while it sits in a worklist.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::ScanStagingEntry;

use crate::error::{AppError, AppResult};

/// Scan staging service
#[derive(Clone)]
pub struct ScanService {
    db: PgPool,
}

/// Input for recording a scan
#[derive(Debug, Deserialize)]
pub struct RecordScanInput {
    pub product_code: String,
}

/// Row shape for scan_staging selects
#[derive(sqlx::FromRow)]
struct StagingRow {
    id: Uuid,
    operator_id: Uuid,
    product_code: String,
    product_type: String,
    quality: String,
    colour: String,
    net_weight: Decimal,
    gross_weight: Decimal,
    created_at: DateTime<Utc>,
}

impl StagingRow {
    fn into_entry(self) -> ScanStagingEntry {
        ScanStagingEntry {
            id: self.id,
            operator_id: self.operator_id,
            product_code: self.product_code,
            product_type: self.product_type,
            quality: self.quality,
            colour: self.colour,
            net_weight: self.net_weight,
            gross_weight: self.gross_weight,
            created_at: self.created_at,
        }
    }
}

impl ScanService {
    /// Create a new ScanService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a scan into the operator's worklist.
    ///
    /// Idempotent on (operator, product code): re-scanning an already
    /// staged code returns the existing row unchanged. The referenced
    /// unit must exist at scan time; its descriptive fields are
    /// snapshotted into the staging row.
    pub async fn record_scan(
        &self,
        operator_id: Uuid,
        input: RecordScanInput,
    ) -> AppResult<ScanStagingEntry> {
        let code = input.product_code.trim();
        if code.is_empty() {
            return Err(AppError::Validation {
                field: "product_code".to_string(),
                message: "Product code cannot be empty".to_string(),
            });
        }

        // Snapshot the unit's descriptive fields at scan time
        let snapshot = sqlx::query_as::<_, (String, String, String, Decimal, Decimal)>(
            r#"
            SELECT pt.name, q.name, c.name, u.net_weight, u.gross_weight
            FROM inventory_units u
            JOIN product_type pt ON pt.id = u.product_type_id
            JOIN quality q ON q.id = u.quality_id
            JOIN colour c ON c.id = u.colour_id
            WHERE u.product_number = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory unit".to_string()))?;

        // DO NOTHING keeps the first scan's snapshot; the later SELECT
        // returns whichever row survived
        sqlx::query(
            r#"
            INSERT INTO scan_staging (
                operator_id, product_code, product_type, quality, colour,
                net_weight, gross_weight
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (operator_id, product_code) DO NOTHING
            "#,
        )
        .bind(operator_id)
        .bind(code)
        .bind(&snapshot.0)
        .bind(&snapshot.1)
        .bind(&snapshot.2)
        .bind(snapshot.3)
        .bind(snapshot.4)
        .execute(&self.db)
        .await?;

        let row = sqlx::query_as::<_, StagingRow>(
            r#"
            SELECT id, operator_id, product_code, product_type, quality, colour,
                   net_weight, gross_weight, created_at
            FROM scan_staging
            WHERE operator_id = $1 AND product_code = $2
            "#,
        )
        .bind(operator_id)
        .bind(code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Scan staging entry".to_string()))?;

        Ok(row.into_entry())
    }

    /// List the operator's current worklist, oldest scan first
    pub async fn list_scans(&self, operator_id: Uuid) -> AppResult<Vec<ScanStagingEntry>> {
        let rows = sqlx::query_as::<_, StagingRow>(
            r#"
            SELECT id, operator_id, product_code, product_type, quality, colour,
                   net_weight, gross_weight, created_at
            FROM scan_staging
            WHERE operator_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(operator_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StagingRow::into_entry).collect())
    }

    /// Remove one entry from the operator's worklist
    pub async fn remove_scan(&self, operator_id: Uuid, product_code: &str) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM scan_staging WHERE operator_id = $1 AND product_code = $2",
        )
        .bind(operator_id)
        .bind(product_code)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Scan staging entry".to_string()));
        }

        Ok(())
    }
}

//! Dispatch manifest service
//!
//! Builds the hierarchical dispatch summary and runs the reconciliation
//! transaction that ties an operator's staged scans to inventory
//! consumption.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{
    ColourGroup, DispatchRecord, DispatchSummary, QualityGroup, ScannedItem, SummaryLine,
};

use crate::error::{AppError, AppResult};
use crate::services::label::parse_labels;

/// Dispatch service for manifest creation and reconciliation
#[derive(Clone)]
pub struct DispatchService {
    db: PgPool,
}

/// Input for creating a dispatch
#[derive(Debug, Deserialize)]
pub struct CreateDispatchInput {
    pub client: String,
    pub vehicle_number: String,
    pub driver_contact: String,
    /// Raw label lines, one per scanned sticker
    pub lines: Vec<String>,
}

/// Input for updating a dispatch status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: String,
}

/// Round a weight sum to 2 decimal places, half away from zero. Fixed so
/// that summary totals are reproducible across runs and platforms.
pub fn round_weight(weight: Decimal) -> Decimal {
    weight.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Group scanned items into the colour -> quality -> product type
/// hierarchy with per-leaf piece counts and weight sums.
///
/// Groups appear in insertion order of first occurrence. Keys are the
/// trimmed strings produced by the parser, compared case-sensitively with
/// no normalization; the result is stable and reproducible for a fixed
/// input order.
pub fn summarize(items: &[ScannedItem]) -> DispatchSummary {
    let mut colours: Vec<ColourGroup> = Vec::new();

    for item in items {
        let c = match colours.iter().position(|c| c.colour == item.colour) {
            Some(i) => i,
            None => {
                colours.push(ColourGroup {
                    colour: item.colour.clone(),
                    qualities: Vec::new(),
                });
                colours.len() - 1
            }
        };
        let colour = &mut colours[c];

        let q = match colour.qualities.iter().position(|q| q.quality == item.quality) {
            Some(i) => i,
            None => {
                colour.qualities.push(QualityGroup {
                    quality: item.quality.clone(),
                    lines: Vec::new(),
                });
                colour.qualities.len() - 1
            }
        };
        let quality = &mut colour.qualities[q];

        match quality
            .lines
            .iter_mut()
            .find(|l| l.product_type == item.product_type)
        {
            Some(line) => {
                line.pieces += 1;
                line.total_weight_kg += item.weight_kg;
            }
            None => quality.lines.push(SummaryLine {
                product_type: item.product_type.clone(),
                pieces: 1,
                total_weight_kg: item.weight_kg,
            }),
        }
    }

    for colour in &mut colours {
        for quality in &mut colour.qualities {
            for line in &mut quality.lines {
                line.total_weight_kg = round_weight(line.total_weight_kg);
            }
        }
    }

    DispatchSummary { colours }
}

/// Manifest totals: item count and the sum of declared per-item weights.
/// The weight is taken from the parsed lines, not re-derived from
/// inventory, since a manifest may reference units already removed.
pub fn manifest_totals(items: &[ScannedItem]) -> (i32, Decimal) {
    let total_weight = round_weight(items.iter().map(|i| i.weight_kg).sum());
    (items.len() as i32, total_weight)
}

/// Row shape for reading dispatch records back out of the store
#[derive(sqlx::FromRow)]
struct DispatchRow {
    id: Uuid,
    client: String,
    vehicle_number: String,
    driver_contact: String,
    scanned_items: serde_json::Value,
    summary: serde_json::Value,
    total_items: i32,
    total_weight: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DispatchRow {
    fn into_record(self) -> AppResult<DispatchRecord> {
        let scanned_items = serde_json::from_value(self.scanned_items)
            .map_err(|e| AppError::Internal(format!("Corrupt scanned_items payload: {}", e)))?;
        let summary = serde_json::from_value(self.summary)
            .map_err(|e| AppError::Internal(format!("Corrupt summary payload: {}", e)))?;

        Ok(DispatchRecord {
            id: self.id,
            client: self.client,
            vehicle_number: self.vehicle_number,
            driver_contact: self.driver_contact,
            scanned_items,
            summary,
            total_items: self.total_items,
            total_weight: self.total_weight,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl DispatchService {
    /// Create a new DispatchService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a dispatch from a batch of raw label lines and reconcile the
    /// operator's staged scans against inventory, all in one transaction.
    ///
    /// Any parse failure aborts before anything is persisted. A staged
    /// code whose inventory unit was already consumed by a concurrent
    /// dispatch is tolerated: the delete count simply comes up short and
    /// is logged. The staging worklist is always cleared on success.
    pub async fn create_dispatch(
        &self,
        operator_id: Uuid,
        input: CreateDispatchInput,
    ) -> AppResult<DispatchRecord> {
        if input.lines.is_empty() {
            return Err(AppError::EmptyDispatch);
        }

        // Steps 1-2: parse everything up front; no side effects on failure
        let items = parse_labels(&input.lines)?;
        let (total_items, total_weight) = manifest_totals(&items);
        let summary = summarize(&items);

        let items_json = serde_json::to_value(&items)
            .map_err(|e| AppError::Internal(format!("Serializing scanned items failed: {}", e)))?;
        let summary_json = serde_json::to_value(&summary)
            .map_err(|e| AppError::Internal(format!("Serializing summary failed: {}", e)))?;

        let mut tx = self.db.begin().await?;

        // Step 3: persist the manifest
        let (id, created_at, updated_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>)>(
            r#"
            INSERT INTO dispatch_records (
                client, vehicle_number, driver_contact, scanned_items, summary,
                total_items, total_weight, status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&input.client)
        .bind(&input.vehicle_number)
        .bind(&input.driver_contact)
        .bind(&items_json)
        .bind(&summary_json)
        .bind(total_items)
        .bind(total_weight)
        .bind(operator_id)
        .fetch_one(&mut *tx)
        .await?;

        // Step 4: the operator's staged product codes
        let staged_codes: Vec<String> = sqlx::query_scalar(
            "SELECT product_code FROM scan_staging WHERE operator_id = $1",
        )
        .bind(operator_id)
        .fetch_all(&mut *tx)
        .await?;

        // Step 5: consume the matching inventory units. The deleted count
        // may be less than the staging set size if another dispatch got to
        // a unit first; that race is tolerated, not an error.
        let deleted = sqlx::query("DELETE FROM inventory_units WHERE product_number = ANY($1)")
            .bind(&staged_codes)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted < staged_codes.len() as u64 {
            tracing::warn!(
                operator = %operator_id,
                staged = staged_codes.len(),
                deleted,
                "dispatch found staged codes with no inventory unit left"
            );
        } else {
            tracing::info!(
                operator = %operator_id,
                staged = staged_codes.len(),
                deleted,
                "dispatch consumed inventory units"
            );
        }

        // Step 6: drain the worklist unconditionally
        sqlx::query("DELETE FROM scan_staging WHERE operator_id = $1")
            .bind(operator_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        // Return the in-memory parsed items and computed summary rather
        // than re-reading the stored JSON
        Ok(DispatchRecord {
            id,
            client: input.client,
            vehicle_number: input.vehicle_number,
            driver_contact: input.driver_contact,
            scanned_items: items,
            summary,
            total_items,
            total_weight,
            status: "pending".to_string(),
            created_at,
            updated_at,
        })
    }

    /// Get a dispatch record by id
    pub async fn get_dispatch(&self, dispatch_id: Uuid) -> AppResult<DispatchRecord> {
        let row = sqlx::query_as::<_, DispatchRow>(
            r#"
            SELECT id, client, vehicle_number, driver_contact, scanned_items, summary,
                   total_items, total_weight, status, created_at, updated_at
            FROM dispatch_records
            WHERE id = $1
            "#,
        )
        .bind(dispatch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Dispatch".to_string()))?;

        row.into_record()
    }

    /// List all dispatch records, newest first
    pub async fn list_dispatches(&self) -> AppResult<Vec<DispatchRecord>> {
        let rows = sqlx::query_as::<_, DispatchRow>(
            r#"
            SELECT id, client, vehicle_number, driver_contact, scanned_items, summary,
                   total_items, total_weight, status, created_at, updated_at
            FROM dispatch_records
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(DispatchRow::into_record).collect()
    }

    /// Update a dispatch status. Status is the only mutable field of a
    /// dispatch record.
    pub async fn update_status(
        &self,
        dispatch_id: Uuid,
        input: UpdateStatusInput,
    ) -> AppResult<DispatchRecord> {
        let status = input.status.trim();
        if status.is_empty() {
            return Err(AppError::Validation {
                field: "status".to_string(),
                message: "Status cannot be empty".to_string(),
            });
        }

        let row = sqlx::query_as::<_, DispatchRow>(
            r#"
            UPDATE dispatch_records
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, client, vehicle_number, driver_contact, scanned_items, summary,
                      total_items, total_weight, status, created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(dispatch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Dispatch".to_string()))?;

        row.into_record()
    }
}

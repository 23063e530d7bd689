//! Inventory unit service: sticker intake, listing, and updates
//!
//! Unit creation is where the serial allocator and code encoder meet the
//! store: the code is minted inside the same transaction that inserts the
//! unit, so the advisory lock covers both.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{InventoryRecord, InventoryUnit};
use shared::types::{Shift, TradingName};
use shared::validation::validate_measurements;

use crate::error::{AppError, AppResult};
use crate::external::QrClient;
use crate::services::product_code::{
    encode_product_code, is_unique_violation, next_serial, next_serial_after, parse_shift,
    peek_max_serial, scope_name, ALLOC_MAX_RETRIES,
};

/// Inventory service for managing produced units
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Input for creating an inventory unit
#[derive(Debug, Deserialize)]
pub struct CreateUnitInput {
    pub quality_id: i32,
    pub colour_id: i32,
    pub product_type_id: i32,
    pub storage_location_id: i32,
    pub shift: String,
    pub trading_name: String,
    pub production_date: NaiveDate,
    pub gsm: i32,
    pub net_weight: Decimal,
    pub gross_weight: Decimal,
    pub length: Decimal,
    pub width: Decimal,
    pub laminated: Option<bool>,
}

/// Input for updating an unconsumed unit. The product code and its
/// embedded (shift, date, serial) triple are immutable and absent here.
#[derive(Debug, Deserialize)]
pub struct UpdateUnitInput {
    pub quality_id: Option<i32>,
    pub colour_id: Option<i32>,
    pub product_type_id: Option<i32>,
    pub storage_location_id: Option<i32>,
    pub gsm: Option<i32>,
    pub net_weight: Option<Decimal>,
    pub gross_weight: Option<Decimal>,
    pub length: Option<Decimal>,
    pub width: Option<Decimal>,
    pub laminated: Option<bool>,
}

/// Canonical QR payload: the unit's identifying fields in a fixed order.
/// The same unit state always serializes to the same string.
#[derive(Debug, Serialize)]
struct QrPayload<'a> {
    id: Uuid,
    product_number: &'a str,
    serial_number: &'a str,
    trading_name: &'a str,
    production_date: NaiveDate,
    shift: &'a str,
    quality_id: i32,
    colour_id: i32,
    product_type_id: i32,
    net_weight: Decimal,
    gross_weight: Decimal,
    created_at: DateTime<Utc>,
}

/// Row shape for inventory_units selects
#[derive(sqlx::FromRow)]
struct UnitRow {
    id: Uuid,
    product_number: String,
    quality_id: i32,
    colour_id: i32,
    product_type_id: i32,
    storage_location_id: i32,
    trading_name: String,
    shift: String,
    production_date: NaiveDate,
    serial_number: i32,
    gsm: i32,
    net_weight: Decimal,
    gross_weight: Decimal,
    length: Decimal,
    width: Decimal,
    is_sold: bool,
    laminated: bool,
    qr_code_data: Option<String>,
    qr_code_filename: Option<String>,
    created_at: DateTime<Utc>,
    created_by: Uuid,
}

impl UnitRow {
    fn into_unit(self) -> AppResult<InventoryUnit> {
        let shift = Shift::from_str(&self.shift)
            .ok_or_else(|| AppError::Internal(format!("Corrupt shift value: {}", self.shift)))?;
        let trading_name = TradingName::from_str(&self.trading_name).ok_or_else(|| {
            AppError::Internal(format!("Corrupt trading name: {}", self.trading_name))
        })?;

        Ok(InventoryUnit {
            id: self.id,
            product_number: self.product_number,
            quality_id: self.quality_id,
            colour_id: self.colour_id,
            product_type_id: self.product_type_id,
            storage_location_id: self.storage_location_id,
            trading_name,
            shift,
            production_date: self.production_date,
            serial_number: format!("{:03}", self.serial_number),
            gsm: self.gsm,
            net_weight: self.net_weight,
            gross_weight: self.gross_weight,
            length: self.length,
            width: self.width,
            is_sold: self.is_sold,
            laminated: self.laminated,
            qr_code_data: self.qr_code_data,
            qr_code_filename: self.qr_code_filename,
            created_at: self.created_at,
            created_by: self.created_by,
        })
    }
}

const UNIT_COLUMNS: &str = "id, product_number, quality_id, colour_id, product_type_id, \
     storage_location_id, trading_name, shift, production_date, serial_number, gsm, \
     net_weight, gross_weight, length, width, is_sold, laminated, qr_code_data, \
     qr_code_filename, created_at, created_by";

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an inventory unit: allocate a code, insert the row, then
    /// render and store its QR label.
    ///
    /// Allocation and insert share one transaction per attempt; a unique
    /// violation that slips past the advisory lock rolls the attempt back
    /// and retries, bounded by ALLOC_MAX_RETRIES. The QR render happens
    /// after commit (no network call under the allocation lock); if it
    /// fails the unit is deleted again so no unit exists without a label.
    pub async fn create_unit(
        &self,
        user_id: Uuid,
        input: CreateUnitInput,
        qr: &QrClient,
    ) -> AppResult<InventoryUnit> {
        let shift = parse_shift(&input.shift)?;
        let trading_name =
            TradingName::from_str(&input.trading_name).ok_or_else(|| AppError::Validation {
                field: "trading_name".to_string(),
                message: format!("Unknown trading name: {}", input.trading_name),
            })?;

        validate_measurements(
            input.net_weight,
            input.gross_weight,
            input.length,
            input.width,
            input.gsm,
        )
        .map_err(|msg| AppError::Validation {
            field: "measurements".to_string(),
            message: msg.to_string(),
        })?;

        let laminated = input.laminated.unwrap_or(false);
        let mut last_err = None;

        for _attempt in 0..ALLOC_MAX_RETRIES {
            let mut tx = self.db.begin().await?;

            let serial = next_serial(&mut *tx, shift, input.production_date).await?;
            let code = encode_product_code(shift, input.production_date, &serial.to_string());

            let inserted = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
                r#"
                INSERT INTO inventory_units (
                    product_number, quality_id, colour_id, product_type_id,
                    storage_location_id, trading_name, shift, production_date,
                    serial_number, gsm, net_weight, gross_weight, length, width,
                    laminated, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                RETURNING id, created_at
                "#,
            )
            .bind(&code)
            .bind(input.quality_id)
            .bind(input.colour_id)
            .bind(input.product_type_id)
            .bind(input.storage_location_id)
            .bind(trading_name.as_str())
            .bind(shift.as_str())
            .bind(input.production_date)
            .bind(serial as i32)
            .bind(input.gsm)
            .bind(input.net_weight)
            .bind(input.gross_weight)
            .bind(input.length)
            .bind(input.width)
            .bind(laminated)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await;

            match inserted {
                Ok((id, created_at)) => {
                    tx.commit().await?;
                    return self
                        .attach_qr_label(
                            InventoryUnit {
                                id,
                                product_number: code,
                                quality_id: input.quality_id,
                                colour_id: input.colour_id,
                                product_type_id: input.product_type_id,
                                storage_location_id: input.storage_location_id,
                                trading_name,
                                shift,
                                production_date: input.production_date,
                                serial_number: format!("{:03}", serial),
                                gsm: input.gsm,
                                net_weight: input.net_weight,
                                gross_weight: input.gross_weight,
                                length: input.length,
                                width: input.width,
                                is_sold: false,
                                laminated,
                                qr_code_data: None,
                                qr_code_filename: None,
                                created_at,
                                created_by: user_id,
                            },
                            qr,
                        )
                        .await;
                }
                Err(e) if is_unique_violation(&e) => {
                    tx.rollback().await?;
                    tracing::debug!(
                        scope = %scope_name(shift, input.production_date),
                        serial,
                        "serial raced a concurrent allocation, retrying"
                    );
                    last_err = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::error!(
            scope = %scope_name(shift, input.production_date),
            ?last_err,
            "serial allocation retries exhausted"
        );
        Err(AppError::AllocationExhausted {
            scope: scope_name(shift, input.production_date),
        })
    }

    /// Render the QR label for a freshly inserted unit and store it. On
    /// failure the unit row is removed again (compensating delete) so the
    /// caller can retry the whole creation.
    async fn attach_qr_label(
        &self,
        mut unit: InventoryUnit,
        qr: &QrClient,
    ) -> AppResult<InventoryUnit> {
        let payload = encode_label_payload(&unit)?;
        let filename = format!("qr_sticker_{}_{}.png", unit.product_number, unit.id);

        let stored = match qr.render(&payload).await {
            Ok(image) => {
                sqlx::query(
                    r#"
                    UPDATE inventory_units
                    SET qr_code_data = $1, qr_code_image = $2, qr_code_filename = $3
                    WHERE id = $4
                    "#,
                )
                .bind(&payload)
                .bind(&image)
                .bind(&filename)
                .bind(unit.id)
                .execute(&self.db)
                .await
                .map_err(AppError::from)
            }
            Err(e) => Err(e),
        };

        if let Err(e) = stored {
            if let Err(del) = sqlx::query("DELETE FROM inventory_units WHERE id = $1")
                .bind(unit.id)
                .execute(&self.db)
                .await
            {
                tracing::error!(
                    unit = %unit.id,
                    error = %del,
                    "failed to remove unit after QR label failure"
                );
            }
            return Err(e);
        }

        unit.qr_code_data = Some(payload);
        unit.qr_code_filename = Some(filename);
        Ok(unit)
    }

    /// Preview the code the allocator would mint next for a scope.
    /// Lock-free: the preview is advisory and must not serialize against
    /// in-flight creations.
    pub async fn preview_product_code(
        &self,
        shift: &str,
        production_date: NaiveDate,
    ) -> AppResult<String> {
        let shift = parse_shift(shift)?;

        let mut conn = self.db.acquire().await?;
        let max = peek_max_serial(&mut *conn, shift, production_date).await?;
        let serial = next_serial_after(max);

        Ok(encode_product_code(shift, production_date, &serial.to_string()))
    }

    /// Get a unit by id
    pub async fn get_unit(&self, unit_id: Uuid) -> AppResult<InventoryUnit> {
        let row = sqlx::query_as::<_, UnitRow>(&format!(
            "SELECT {} FROM inventory_units WHERE id = $1",
            UNIT_COLUMNS
        ))
        .bind(unit_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory unit".to_string()))?;

        row.into_unit()
    }

    /// Update an unconsumed unit's measurement fields, reference links,
    /// and lamination flag
    pub async fn update_unit(
        &self,
        unit_id: Uuid,
        input: UpdateUnitInput,
    ) -> AppResult<InventoryUnit> {
        let existing = self.get_unit(unit_id).await?;

        if existing.is_sold {
            return Err(AppError::UnitConsumed(existing.product_number));
        }

        let net_weight = input.net_weight.unwrap_or(existing.net_weight);
        let gross_weight = input.gross_weight.unwrap_or(existing.gross_weight);
        let length = input.length.unwrap_or(existing.length);
        let width = input.width.unwrap_or(existing.width);
        let gsm = input.gsm.unwrap_or(existing.gsm);

        validate_measurements(net_weight, gross_weight, length, width, gsm).map_err(|msg| {
            AppError::Validation {
                field: "measurements".to_string(),
                message: msg.to_string(),
            }
        })?;

        let row = sqlx::query_as::<_, UnitRow>(&format!(
            r#"
            UPDATE inventory_units
            SET quality_id = $1, colour_id = $2, product_type_id = $3,
                storage_location_id = $4, gsm = $5, net_weight = $6,
                gross_weight = $7, length = $8, width = $9, laminated = $10
            WHERE id = $11 AND is_sold = FALSE
            RETURNING {}
            "#,
            UNIT_COLUMNS
        ))
        .bind(input.quality_id.unwrap_or(existing.quality_id))
        .bind(input.colour_id.unwrap_or(existing.colour_id))
        .bind(input.product_type_id.unwrap_or(existing.product_type_id))
        .bind(input.storage_location_id.unwrap_or(existing.storage_location_id))
        .bind(gsm)
        .bind(net_weight)
        .bind(gross_weight)
        .bind(length)
        .bind(width)
        .bind(input.laminated.unwrap_or(existing.laminated))
        .bind(unit_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory unit".to_string()))?;

        row.into_unit()
    }

    /// Joined inventory listing: code, type, weight, colour, quality
    pub async fn list_records(&self) -> AppResult<Vec<InventoryRecord>> {
        let rows = sqlx::query_as::<_, (String, String, Decimal, String, String)>(
            r#"
            SELECT u.product_number, pt.name, u.net_weight, c.name, q.name
            FROM inventory_units u
            JOIN product_type pt ON pt.id = u.product_type_id
            JOIN colour c ON c.id = u.colour_id
            JOIN quality q ON q.id = u.quality_id
            ORDER BY u.product_number
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| InventoryRecord {
                product_code: r.0,
                product_type: r.1,
                weight: r.2,
                colour: r.3,
                quality: r.4,
            })
            .collect())
    }

    /// Stored QR image bytes and filename for a unit
    pub async fn get_qr_image(&self, unit_id: Uuid) -> AppResult<(Vec<u8>, String)> {
        let row = sqlx::query_as::<_, (Option<Vec<u8>>, Option<String>)>(
            "SELECT qr_code_image, qr_code_filename FROM inventory_units WHERE id = $1",
        )
        .bind(unit_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory unit".to_string()))?;

        match row {
            (Some(image), Some(filename)) => Ok((image, filename)),
            _ => Err(AppError::NotFound("QR code".to_string())),
        }
    }
}

/// Deterministic payload string for a unit's machine-scannable label
pub fn encode_label_payload(unit: &InventoryUnit) -> AppResult<String> {
    let payload = QrPayload {
        id: unit.id,
        product_number: &unit.product_number,
        serial_number: &unit.serial_number,
        trading_name: unit.trading_name.as_str(),
        production_date: unit.production_date,
        shift: unit.shift.as_str(),
        quality_id: unit.quality_id,
        colour_id: unit.colour_id,
        product_type_id: unit.product_type_id,
        net_weight: unit.net_weight,
        gross_weight: unit.gross_weight,
        created_at: unit.created_at,
    };

    serde_json::to_string(&payload)
        .map_err(|e| AppError::Internal(format!("Serializing QR payload failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_unit() -> InventoryUnit {
        InventoryUnit {
            id: Uuid::nil(),
            product_number: "A24MY001".to_string(),
            quality_id: 1,
            colour_id: 2,
            product_type_id: 3,
            storage_location_id: 4,
            trading_name: TradingName::Bharat,
            shift: Shift::Day,
            production_date: NaiveDate::from_ymd_opt(2024, 5, 24).unwrap(),
            serial_number: "001".to_string(),
            gsm: 80,
            net_weight: Decimal::from_str("45.6").unwrap(),
            gross_weight: Decimal::from_str("46.0").unwrap(),
            length: Decimal::from_str("100.0").unwrap(),
            width: Decimal::from_str("50.0").unwrap(),
            is_sold: false,
            laminated: false,
            qr_code_data: None,
            qr_code_filename: None,
            created_at: DateTime::<Utc>::MIN_UTC,
            created_by: Uuid::nil(),
        }
    }

    #[test]
    fn test_label_payload_is_deterministic() {
        let unit = sample_unit();
        let a = encode_label_payload(&unit).unwrap();
        let b = encode_label_payload(&unit).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("\"product_number\":\"A24MY001\""));
    }

    #[test]
    fn test_label_payload_reflects_unit_state() {
        let mut unit = sample_unit();
        let before = encode_label_payload(&unit).unwrap();
        unit.net_weight = Decimal::from_str("50.0").unwrap();
        let after = encode_label_payload(&unit).unwrap();
        assert_ne!(before, after);
    }
}

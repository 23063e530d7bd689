//! HTTP handlers for inventory unit endpoints

use axum::{
    extract::{Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::external::QrClient;
use crate::middleware::CurrentUser;
use crate::services::inventory::{CreateUnitInput, UpdateUnitInput};
use crate::services::InventoryService;
use crate::AppState;
use shared::models::{InventoryRecord, InventoryUnit};

/// Create an inventory unit and its QR label
pub async fn create_unit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateUnitInput>,
) -> AppResult<(StatusCode, Json<InventoryUnit>)> {
    let service = InventoryService::new(state.db.clone());
    let qr = QrClient::new(&state.config.qr)?;
    let unit = service
        .create_unit(current_user.0.user_id, input, &qr)
        .await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub shift: String,
    pub production_date: NaiveDate,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub product_number: String,
}

/// Preview the next product code for a (shift, date) scope without
/// allocating it
pub async fn preview_product_code(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Json<PreviewResponse>> {
    let service = InventoryService::new(state.db.clone());
    let product_number = service
        .preview_product_code(&query.shift, query.production_date)
        .await?;
    Ok(Json(PreviewResponse { product_number }))
}

/// Joined inventory listing
pub async fn list_inventory_records(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryRecord>>> {
    let service = InventoryService::new(state.db.clone());
    let records = service.list_records().await?;
    Ok(Json(records))
}

/// Get one unit by id
pub async fn get_unit(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<InventoryUnit>> {
    let service = InventoryService::new(state.db.clone());
    let unit = service.get_unit(unit_id).await?;
    Ok(Json(unit))
}

/// Update an unconsumed unit
pub async fn update_unit(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
    Json(input): Json<UpdateUnitInput>,
) -> AppResult<Json<InventoryUnit>> {
    let service = InventoryService::new(state.db.clone());
    let unit = service.update_unit(unit_id, input).await?;
    Ok(Json(unit))
}

/// View a unit's QR label inline
pub async fn view_qr_code(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Response> {
    let service = InventoryService::new(state.db.clone());
    let (image, filename) = service.get_qr_image(unit_id).await?;

    Ok((
        [
            (CONTENT_TYPE, "image/png".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", filename),
            ),
        ],
        image,
    )
        .into_response())
}

/// Download a unit's QR label as an attachment
pub async fn download_qr_code(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Response> {
    let service = InventoryService::new(state.db.clone());
    let (image, filename) = service.get_qr_image(unit_id).await?;

    Ok((
        [
            (CONTENT_TYPE, "image/png".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        image,
    )
        .into_response())
}

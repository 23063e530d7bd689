//! HTTP handlers for the scan staging worklist

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::scan::RecordScanInput;
use crate::services::ScanService;
use crate::AppState;
use shared::models::ScanStagingEntry;

/// Record a scanned product code into the operator's worklist
pub async fn record_scan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordScanInput>,
) -> AppResult<(StatusCode, Json<ScanStagingEntry>)> {
    let service = ScanService::new(state.db.clone());
    let entry = service.record_scan(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// List the operator's staged scans
pub async fn list_scans(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ScanStagingEntry>>> {
    let service = ScanService::new(state.db.clone());
    let entries = service.list_scans(current_user.0.user_id).await?;
    Ok(Json(entries))
}

/// Remove one staged scan from the operator's worklist
pub async fn remove_scan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_code): Path<String>,
) -> AppResult<Json<()>> {
    let service = ScanService::new(state.db.clone());
    service
        .remove_scan(current_user.0.user_id, &product_code)
        .await?;
    Ok(Json(()))
}

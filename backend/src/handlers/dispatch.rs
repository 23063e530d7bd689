//! HTTP handlers for dispatch endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dispatch::{CreateDispatchInput, UpdateStatusInput};
use crate::services::DispatchService;
use crate::AppState;
use shared::models::DispatchRecord;

/// Create a dispatch and reconcile inventory against its manifest
pub async fn create_dispatch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateDispatchInput>,
) -> AppResult<(StatusCode, Json<DispatchRecord>)> {
    let service = DispatchService::new(state.db.clone());
    let record = service
        .create_dispatch(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Get one dispatch record by id
pub async fn get_dispatch(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(dispatch_id): Path<Uuid>,
) -> AppResult<Json<DispatchRecord>> {
    let service = DispatchService::new(state.db.clone());
    let record = service.get_dispatch(dispatch_id).await?;
    Ok(Json(record))
}

/// List dispatch records, newest first
pub async fn list_dispatches(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<DispatchRecord>>> {
    let service = DispatchService::new(state.db.clone());
    let records = service.list_dispatches().await?;
    Ok(Json(records))
}

/// Update a dispatch record's status
pub async fn update_dispatch_status(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(dispatch_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<DispatchRecord>> {
    let service = DispatchService::new(state.db.clone());
    let record = service.update_status(dispatch_id, input).await?;
    Ok(Json(record))
}

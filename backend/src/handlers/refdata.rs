//! HTTP handlers for reference-data administration

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::refdata::{RefItemInput, RefTable};
use crate::services::RefDataService;
use crate::AppState;
use shared::models::{MasterNames, RefItem};

fn parse_table(table: &str) -> AppResult<RefTable> {
    RefTable::from_str(table)
        .ok_or_else(|| AppError::NotFound(format!("Reference table '{}'", table)))
}

fn require_admin(current_user: &CurrentUser) -> AppResult<()> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    Ok(())
}

/// List items of one reference table
pub async fn list_ref_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(table): Path<String>,
) -> AppResult<Json<Vec<RefItem>>> {
    let table = parse_table(&table)?;
    let service = RefDataService::new(state.db.clone());
    let items = service.list_items(table).await?;
    Ok(Json(items))
}

/// Create a reference item (admin only)
pub async fn create_ref_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(table): Path<String>,
    Json(input): Json<RefItemInput>,
) -> AppResult<(StatusCode, Json<RefItem>)> {
    require_admin(&current_user)?;
    let table = parse_table(&table)?;
    let service = RefDataService::new(state.db.clone());
    let item = service.create_item(table, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Get one reference item
pub async fn get_ref_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path((table, item_id)): Path<(String, i32)>,
) -> AppResult<Json<RefItem>> {
    let table = parse_table(&table)?;
    let service = RefDataService::new(state.db.clone());
    let item = service.get_item(table, item_id).await?;
    Ok(Json(item))
}

/// Rename a reference item (admin only)
pub async fn update_ref_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((table, item_id)): Path<(String, i32)>,
    Json(input): Json<RefItemInput>,
) -> AppResult<Json<RefItem>> {
    require_admin(&current_user)?;
    let table = parse_table(&table)?;
    let service = RefDataService::new(state.db.clone());
    let item = service.update_item(table, item_id, input).await?;
    Ok(Json(item))
}

/// Delete a reference item (admin only)
pub async fn delete_ref_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((table, item_id)): Path<(String, i32)>,
) -> AppResult<Json<()>> {
    require_admin(&current_user)?;
    let table = parse_table(&table)?;
    let service = RefDataService::new(state.db.clone());
    service.delete_item(table, item_id).await?;
    Ok(Json(()))
}

/// All four lookup tables in one response, for form population
pub async fn get_master_names(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<MasterNames>> {
    let service = RefDataService::new(state.db.clone());
    let names = service.master_names().await?;
    Ok(Json(names))
}

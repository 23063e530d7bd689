//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{
    AuthTokens, LoginInput, RefreshInput, RegisterInput, RegisterResponse,
};
use crate::services::AuthService;
use crate::AppState;
use shared::models::User;

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let response = auth_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthTokens>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.login(input).await?;
    Ok(Json(tokens))
}

/// Refresh token endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<AuthTokens>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.refresh(&input.refresh_token).await?;
    Ok(Json(tokens))
}

/// Current user profile handler
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let user = auth_service.get_user(current_user.0.user_id).await?;
    Ok(Json(user))
}

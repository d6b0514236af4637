use axum::extract::State;
use axum::Json;
use domains::PublicUser;
use serde::Deserialize;

use super::TokenResponse;
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/auth`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user_id = state.users.authenticate(&req.email, &req.password).await?;
    let token = state.tokens.issue(user_id).map_err(ApiError::internal)?;
    Ok(Json(TokenResponse { token }))
}

/// `GET /api/auth`
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<PublicUser>, ApiError> {
    Ok(Json(state.users.profile(&caller).await?))
}

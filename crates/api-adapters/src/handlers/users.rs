use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::TokenResponse;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// Missing fields deserialize as empty strings so they fail validation with
/// a message instead of a bare deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/users`
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user_id = state.users.register(&req.name, &req.email, &req.password).await?;
    // The account is already stored here. A signing failure answers 500 and
    // the caller recovers through login, not by registering again.
    let token = state.tokens.issue(user_id).map_err(ApiError::internal)?;
    Ok(Json(TokenResponse { token }))
}

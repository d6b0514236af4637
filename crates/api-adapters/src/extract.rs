//! Request extractors: caller identity and JSON bodies.
//!
//! The credential is taken from `x-auth-token` or, failing that, from an
//! `Authorization: Bearer` header, and handed to the configured
//! [`AuthProvider`](domains::AuthProvider). Handlers that take a
//! [`CurrentUser`] never run for anonymous requests.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use domains::{AuthContext, DomainError};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::state::AppState;

pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub AuthContext);

fn credential(parts: &Parts) -> Option<String> {
    if let Some(token) = parts.headers.get(AUTH_TOKEN_HEADER).and_then(|h| h.to_str().ok()) {
        return Some(token.trim().to_string());
    }
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = credential(parts)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| DomainError::Unauthorized("No token, authorization denied".to_string()))?;
        let ctx = state.auth.resolve(&token).await?;
        Ok(CurrentUser(ctx))
    }
}

/// `Json<T>` whose rejections answer 400 with the usual `{"msg"}` body
/// instead of axum's plain-text 415/422.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

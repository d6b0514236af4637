//! Boundary mapping of [`DomainError`] to status codes and response bodies.

use domains::DomainError;
use serde::Serialize;

/// Every error response has this shape: `{"msg": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub msg: String,
}

#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    /// An infrastructure failure outside the services (e.g., token signing).
    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = ?err, "internal failure at the boundary");
        Self(DomainError::Storage(err.to_string()))
    }

    pub fn status_code(&self) -> u16 {
        self.0.status_code()
    }

    /// Message safe to show the caller. Storage internals never leave.
    pub fn public_message(&self) -> String {
        match &self.0 {
            DomainError::Validation(msg) | DomainError::Unauthorized(msg) => msg.clone(),
            DomainError::Storage(_) => "Server Error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody { msg: self.public_message() }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

#[cfg(feature = "web-axum")]
mod axum_impl {
    use super::ApiError;
    use axum::extract::rejection::JsonRejection;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use domains::DomainError;

    impl From<JsonRejection> for ApiError {
        fn from(rejection: JsonRejection) -> Self {
            tracing::debug!(error = %rejection, "rejected request body");
            Self(DomainError::Validation(rejection.body_text()))
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(self.body())).into_response()
        }
    }
}

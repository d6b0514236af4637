//! # api-adapters
//!
//! The HTTP boundary. Error-to-status mapping is always compiled; the axum
//! router, extractors and handlers are behind the `web-axum` feature.

pub mod error;

#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod state;

pub use error::ApiError;

#[cfg(feature = "web-axum")]
pub use state::AppState;

/// Builds the full router.
///
/// Only one delete route exists: `DELETE /api/posts/{id}`.
#[cfg(feature = "web-axum")]
pub fn router(state: AppState) -> axum::Router {
    use axum::routing::{get, post, put};

    let api = axum::Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/users", post(handlers::users::register))
        .route("/api/auth", post(handlers::auth::login).get(handlers::auth::me))
        .route("/api/posts", post(handlers::posts::create).get(handlers::posts::list))
        .route(
            "/api/posts/{id}",
            get(handlers::posts::get_by_id).delete(handlers::posts::delete),
        )
        .route("/api/posts/like/{id}", put(handlers::posts::like))
        .route("/api/posts/unlike/{id}", put(handlers::posts::unlike));

    middleware::add_standard_layers(api).with_state(state)
}

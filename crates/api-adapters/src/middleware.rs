//! Tracing and CORS layers for the router.

use std::time::Duration;

use axum::http::{self, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;

/// Logs one span per request and the response status with latency.
pub fn add_standard_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|req: &http::Request<_>| {
                        let method = req.method().clone();
                        let uri = req.uri().path().to_string();
                        tracing::span!(Level::INFO, "http", %method, %uri)
                    })
                    .on_response(
                        |res: &http::Response<_>, latency: Duration, _span: &tracing::Span| {
                            tracing::info!(
                                status = %res.status(),
                                elapsed_ms = latency.as_millis() as u64,
                                "response"
                            );
                        },
                    ),
            )
            .layer(cors_policy()),
    )
}

/// The UI is served from a different origin in development.
pub fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

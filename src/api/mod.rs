//! API module
//!
//! Builds the axum router and its middleware stack. Routes are registered
//! once at startup; every handler is a thin adapter from a validated
//! request to a single service call.

pub mod extract;
pub mod folders;
pub mod health;

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::Config;

#[derive(Serialize)]
struct BannerResponse {
    message: String,
}

/// GET / - service banner
async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Nebula Client API".to_string(),
    })
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// Converts a handler panic into a generic 500 response.
///
/// This is the single unwinding boundary: the panic payload is logged but
/// never reaches the caller.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    error!("handler panicked: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "detail": "internal server error" })),
    )
        .into_response()
}

/// Build the application router with all routes and middleware registered.
///
/// The configuration is the only shared state; it is immutable, so
/// handlers can run concurrently without coordination.
pub fn router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health::health_check))
        .route("/folders/inspect", post(folders::inspect_folder))
        .route("/folders/snapshot", post(folders::snapshot_folder))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive()) // Allow CORS for development
        .with_state(config)
}

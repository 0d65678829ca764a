//! HTTP route handlers.

use std::any::Any;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::error;

use super::dto::CrossingStatusResponse;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    with_layers(
        Router::new()
            .route("/health", get(health))
            .route("/api/crossing-status", get(crossing_status))
            .with_state(state),
    )
}

/// No-cache headers on every response, and a JSON 500 for handler panics.
fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Estimate the crossing state from the station feeds, as of now.
///
/// 503 when no feed answered, 200 otherwise.
async fn crossing_status(State(state): State<AppState>) -> Response {
    let evaluation = state.aggregator.evaluate(Utc::now).await;
    let body = CrossingStatusResponse::from_evaluation(evaluation, Utc::now(), state.include_raw);

    let status = if body.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status, Json(body)).into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(error = %detail, "request handler panicked");

    let body = CrossingStatusResponse::internal_failure(detail, Utc::now());
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

//! Router assembly.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{create_video, get_video, health, list_videos, not_found, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// `/api/videos` and `/api/videos/:video_id`.
fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(list_videos).post(create_video))
        .route("/videos/:video_id", get(get_video))
}

/// Probes, plus `/metrics` when a Prometheus handle is given.
fn ops_routes(metrics_handle: Option<PrometheusHandle>) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    match metrics_handle {
        Some(handle) => router.route("/metrics", get(move || async move { handle.render() })),
        None => router,
    }
}

/// Build the full application router.
///
/// Layers run outermost-last: CORS sees the request first, the body limit last.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    Router::new()
        .nest("/api", video_routes())
        .merge(ops_routes(metrics_handle))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

//! Video proxy handlers.
//!
//! Each handler checks the provider credential first, then makes exactly one
//! provider call. Success bodies are forwarded exactly as the provider sent
//! them. Provider rejections keep their HTTP status and carry the provider's
//! raw error text in `details`.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use vgen_models::{CreateVideoRequest, VideoId};
use vgen_provider::{ProviderError, ProviderResult};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Record the provider call and map its failure for the client.
fn finish<T>(
    operation: &'static str,
    failure_message: &'static str,
    start: Instant,
    result: ProviderResult<T>,
) -> ApiResult<T> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    metrics::record_provider_call(operation, outcome, start.elapsed().as_secs_f64());

    result.map_err(|e| {
        if let ProviderError::Upstream { status, body } = &e {
            warn!(operation, status, body = %body, "Provider rejected request");
        }
        ApiError::from_provider(e, failure_message)
    })
}

/// Fail the request before any provider call when no credential is configured.
fn require_credential(state: &AppState) -> ApiResult<()> {
    state
        .provider
        .ensure_configured()
        .map(|_| ())
        .map_err(|_| ApiError::ConfigurationMissing)
}

/// `POST /api/videos`
pub async fn create_video(
    State(state): State<AppState>,
    payload: Result<Json<CreateVideoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_credential(&state)?;

    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    request
        .validate()
        .map_err(|_| ApiError::bad_request("Script is required"))?;

    let start = Instant::now();
    let result = state.provider.create_video(request).await;
    let video = finish("create", "Failed to create video", start, result)?;

    info!(
        video_id = video.get("id").and_then(serde_json::Value::as_str).unwrap_or_default(),
        status = video.get("status").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
        "Video created"
    );

    Ok((StatusCode::CREATED, Json(video)))
}

/// `GET /api/videos`
pub async fn list_videos(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    require_credential(&state)?;

    let start = Instant::now();
    let result = state.provider.list_videos().await;
    let list = finish("list", "Failed to fetch videos", start, result)?;

    Ok(Json(list))
}

/// `GET /api/videos/:video_id`
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_credential(&state)?;

    let video_id = VideoId::from(video_id);
    let start = Instant::now();
    let result = state.provider.get_video(&video_id).await;
    let video = finish("get", "Failed to fetch video", start, result)?;

    Ok(Json(video))
}

/// Fallback for paths outside the API.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

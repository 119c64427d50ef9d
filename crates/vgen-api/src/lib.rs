//! Axum HTTP proxy for the video-generation provider.
//!
//! This crate provides:
//! - `/api/videos` create, list and get-by-id, forwarded to the provider
//! - Uniform `{error, details}` error bodies with the provider's status passed through
//! - CORS, security headers and request IDs
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

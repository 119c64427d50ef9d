//! Client for the video-generation provider (Synthesia-compatible API).
//!
//! Three operations are exposed: create a video, list videos, and fetch one
//! video by id. Every call is a single attempt; failures surface the
//! provider's raw error text so the proxy can forward it.

pub mod client;
pub mod error;

pub use client::{ProviderClient, ProviderConfig};
pub use error::{ProviderError, ProviderResult};

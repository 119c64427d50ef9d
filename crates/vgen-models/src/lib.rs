//! Shared data models for the VGen video studio.
//!
//! This crate provides Serde-serializable types for:
//! - Provider videos and their lifecycle status
//! - Video creation requests and the avatar/background catalogue
//! - The provider's create-video wire body
//! - The JSON error envelope returned by the proxy

pub mod catalogue;
pub mod error_body;
pub mod request;
pub mod timestamp;
pub mod video;

// Re-export common types
pub use catalogue::{CatalogueEntry, AVATARS, BACKGROUNDS, DEFAULT_AVATAR, DEFAULT_BACKGROUND};
pub use error_body::ErrorBody;
pub use timestamp::Timestamp;
pub use request::{CreateVideoRequest, ProviderCreateBody, ProviderVideoInput, DEFAULT_TITLE};
pub use video::{Video, VideoId, VideoList, VideoStatus};

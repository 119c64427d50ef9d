//! Provider video models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::timestamp::Timestamp;

/// Provider-assigned video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Video generation status as reported by the provider.
///
/// Unrecognized values are kept verbatim in [`VideoStatus::Other`] so the
/// proxy forwards them unchanged; they display as `unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VideoStatus {
    /// Accepted by the provider, not started
    Pending,
    /// Rendering
    InProgress,
    /// Rendered; a download URL is available
    Complete,
    /// Rendering failed
    Failed,
    /// Any status string this client does not know about
    Other(String),
}

impl VideoStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::InProgress => "in_progress",
            VideoStatus::Complete => "complete",
            VideoStatus::Failed => "failed",
            VideoStatus::Other(s) => s,
        }
    }

    /// Label shown to users. Unknown statuses collapse to `unknown`.
    pub fn label(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::InProgress => "in_progress",
            VideoStatus::Complete => "complete",
            VideoStatus::Failed => "failed",
            VideoStatus::Other(_) => "unknown",
        }
    }

    /// Still being worked on by the provider; these are the statuses that get polled.
    pub fn is_active(&self) -> bool {
        matches!(self, VideoStatus::Pending | VideoStatus::InProgress)
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Complete | VideoStatus::Failed)
    }
}

impl From<String> for VideoStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => VideoStatus::Pending,
            "in_progress" => VideoStatus::InProgress,
            "complete" => VideoStatus::Complete,
            "failed" => VideoStatus::Failed,
            _ => VideoStatus::Other(s),
        }
    }
}

impl From<&str> for VideoStatus {
    fn from(s: &str) -> Self {
        VideoStatus::from(s.to_string())
    }
}

impl From<VideoStatus> for String {
    fn from(status: VideoStatus) -> Self {
        match status {
            VideoStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A video as returned by the provider.
///
/// Fields this crate does not model are preserved in `extra`, and timestamps
/// keep their original form, so re-serializing a video gives back what the
/// provider sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VideoStatus>,

    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    /// The provider's own name for the last-modified time
    #[serde(rename = "lastUpdatedAt", default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<Timestamp>,

    /// Present once the video is complete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Video {
    /// Create a video with only an id and status.
    pub fn new(id: impl Into<VideoId>, status: VideoStatus) -> Self {
        Self {
            id: id.into(),
            title: None,
            status: Some(status),
            created_at: None,
            updated_at: None,
            last_updated_at: None,
            download: None,
            extra: Map::new(),
        }
    }

    /// Whether this video should be under status polling.
    pub fn is_active(&self) -> bool {
        self.status.as_ref().is_some_and(VideoStatus::is_active)
    }

    /// Whether the provider has finished with this video.
    pub fn is_terminal(&self) -> bool {
        self.status.as_ref().is_some_and(VideoStatus::is_terminal)
    }

    /// Status label for display; absent statuses read as `unknown`.
    pub fn status_label(&self) -> &'static str {
        self.status.as_ref().map_or("unknown", VideoStatus::label)
    }

    /// Creation time in unix seconds, if readable.
    pub fn created_secs(&self) -> Option<i64> {
        self.created_at.as_ref().and_then(Timestamp::unix_secs)
    }

    /// Last-modified time in unix seconds, from whichever field the provider sent.
    pub fn updated_secs(&self) -> Option<i64> {
        self.last_updated_at
            .as_ref()
            .or(self.updated_at.as_ref())
            .and_then(Timestamp::unix_secs)
    }

    /// Download URL, only when the video is complete.
    pub fn download_url(&self) -> Option<&str> {
        match self.status {
            Some(VideoStatus::Complete) => self.download.as_deref(),
            _ => None,
        }
    }
}

/// Provider list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub videos: Vec<Video>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

//! Video creation request and the provider's create body.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::catalogue::{DEFAULT_AVATAR, DEFAULT_BACKGROUND};

/// Title used when a request does not supply one.
pub const DEFAULT_TITLE: &str = "Generated Video";

/// Body of `POST /api/videos`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Text the avatar speaks
    #[serde(default)]
    #[validate(custom(function = "validate_script"))]
    pub script: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[allow(clippy::ptr_arg)]
fn validate_script(script: &String) -> Result<(), ValidationError> {
    if script.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Script is required".into());
        return Err(err);
    }
    Ok(())
}

/// Empty strings count as absent, like an untouched form field.
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl CreateVideoRequest {
    /// Create a request for a script with every other field defaulted.
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }

    /// Build the provider body, filling in default title, avatar and background.
    pub fn into_provider_body(self, test: bool) -> ProviderCreateBody {
        ProviderCreateBody {
            title: or_default(self.title, DEFAULT_TITLE),
            test,
            input: vec![ProviderVideoInput {
                script_text: self.script,
                avatar: or_default(self.avatar, DEFAULT_AVATAR),
                background: or_default(self.background, DEFAULT_BACKGROUND),
            }],
        }
    }
}

/// Provider `POST /videos` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCreateBody {
    pub title: String,
    /// Test videos are watermarked and do not consume credits
    pub test: bool,
    pub input: Vec<ProviderVideoInput>,
}

/// One scene of a provider video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderVideoInput {
    #[serde(rename = "scriptText")]
    pub script_text: String,
    pub avatar: String,
    pub background: String,
}

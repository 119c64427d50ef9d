//! Provider HTTP client.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};
use validator::Validate;

use vgen_models::{CreateVideoRequest, VideoId};

use crate::error::{ProviderError, ProviderResult};

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "SYNTHESIA_API_KEY";

/// Configuration for the provider client.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider API (no trailing slash)
    pub base_url: String,
    /// Credential sent in the `Authorization` header; takes precedence over
    /// `api_key_env`
    pub api_key: Option<String>,
    /// Environment variable read for the credential on every request
    pub api_key_env: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Create watermarked test videos that do not consume credits
    pub test_mode: bool,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("timeout", &self.timeout)
            .field("test_mode", &self.test_mode)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.synthesia.io/v2".to_string(),
            api_key: None,
            api_key_env: None,
            timeout: Duration::from_secs(30),
            test_mode: true,
        }
    }
}

impl ProviderConfig {
    /// Create config from environment variables.
    ///
    /// The credential is not captured here: `SYNTHESIA_API_KEY` is looked up
    /// again on each request, so it can be set or rotated without a restart.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SYNTHESIA_API_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://api.synthesia.io/v2".to_string()),
            api_key: None,
            api_key_env: Some(API_KEY_ENV.to_string()),
            timeout: Duration::from_secs(
                std::env::var("SYNTHESIA_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            test_mode: std::env::var("SYNTHESIA_TEST_MODE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Set the credential.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read the credential from `var` on every request.
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    /// The credential in effect right now.
    pub fn current_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }
        self.api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Point the client at a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Client for the video-generation provider.
#[derive(Clone)]
pub struct ProviderClient {
    http: Client,
    config: ProviderConfig,
}

impl ProviderClient {
    /// Create a new provider client.
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ProviderResult<Self> {
        Self::new(ProviderConfig::from_env())
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.current_api_key().is_some()
    }

    /// Fail with [`ProviderError::MissingCredential`] when no API key is set.
    pub fn ensure_configured(&self) -> ProviderResult<String> {
        self.config
            .current_api_key()
            .ok_or(ProviderError::MissingCredential)
    }

    /// Submit a new video for generation.
    ///
    /// Like the other calls, returns the provider's JSON body as received.
    pub async fn create_video(&self, request: CreateVideoRequest) -> ProviderResult<Value> {
        let api_key = self.ensure_configured()?;
        request
            .validate()
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;

        let body = request.into_provider_body(self.config.test_mode);
        let url = format!("{}/videos", self.config.base_url);

        debug!(
            title = %body.title,
            test = body.test,
            "Sending create request to provider"
        );

        let response = self
            .authorized(self.http.post(&url), &api_key)
            .json(&body)
            .send()
            .await?;

        decode(response).await
    }

    /// List every video visible to the credential.
    pub async fn list_videos(&self) -> ProviderResult<Value> {
        let api_key = self.ensure_configured()?;
        let url = format!("{}/videos", self.config.base_url);

        let response = self
            .authorized(self.http.get(&url), &api_key)
            .send()
            .await?;

        decode(response).await
    }

    /// Fetch one video by id.
    pub async fn get_video(&self, id: &VideoId) -> ProviderResult<Value> {
        let api_key = self.ensure_configured()?;
        let url = format!(
            "{}/videos/{}",
            self.config.base_url,
            urlencoding::encode(id.as_str())
        );

        let response = self
            .authorized(self.http.get(&url), &api_key)
            .send()
            .await?;

        decode(response).await
    }

    fn authorized(&self, builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, api_key)
            .header(ACCEPT, "application/json")
    }
}

/// Map non-success responses to [`ProviderError::Upstream`]. Success bodies
/// only have to be JSON; their shape is the provider's business.
async fn decode(response: Response) -> ProviderResult<Value> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Provider API error");
        return Err(ProviderError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

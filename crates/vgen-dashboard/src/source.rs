//! Where the dashboard gets videos from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use vgen_models::{CreateVideoRequest, ErrorBody, Video, VideoId, VideoList};

use crate::error::{DashboardError, DashboardResult};

/// The three operations the dashboard needs from the proxy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn list_videos(&self) -> DashboardResult<Vec<Video>>;

    async fn create_video(&self, request: CreateVideoRequest) -> DashboardResult<Video>;

    async fn get_video(&self, id: &VideoId) -> DashboardResult<Video>;
}

/// HTTP client for the vgen-api proxy.
#[derive(Clone)]
pub struct ProxyClient {
    http: Client,
    base_url: Url,
}

impl ProxyClient {
    pub fn new(base_url: &str, timeout: Duration) -> DashboardResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DashboardError::InvalidConfig(format!("api url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::InvalidConfig(format!(
                "api url {base_url} cannot be a base"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DashboardError::Network)?;

        Ok(Self { http, base_url })
    }

    /// `<base>/api/videos[/<id>]`, with the id encoded as one path segment.
    fn videos_url(&self, id: Option<&VideoId>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "videos"]);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }
}

#[async_trait]
impl VideoSource for ProxyClient {
    async fn list_videos(&self) -> DashboardResult<Vec<Video>> {
        let response = self.http.get(self.videos_url(None)).send().await?;
        let list: VideoList = decode(response).await?;
        Ok(list.videos)
    }

    async fn create_video(&self, request: CreateVideoRequest) -> DashboardResult<Video> {
        let response = self
            .http
            .post(self.videos_url(None))
            .json(&request)
            .send()
            .await?;
        decode(response).await
    }

    async fn get_video(&self, id: &VideoId) -> DashboardResult<Video> {
        debug!(video_id = %id, "Fetching video status");
        let response = self.http.get(self.videos_url(Some(id))).send().await?;
        decode(response).await
    }
}

/// Decode a success body, or turn the proxy's `{error, details}` envelope
/// into [`DashboardError::Rejected`].
async fn decode<T: DeserializeOwned>(response: Response) -> DashboardResult<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Request failed").to_string());
        return Err(DashboardError::rejected(status.as_u16(), message));
    }

    Ok(serde_json::from_str(&text)?)
}

//! Dashboard controller.
//!
//! Owns the view state and the reconciler, and is the only thing that turns
//! proxy responses into view mutations.

use std::sync::Arc;

use tracing::{error, info};

use vgen_models::{CreateVideoRequest, Video, VideoId};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::reconcile::Reconciler;
use crate::source::VideoSource;
use crate::state::SharedViewState;

const LOAD_FAILED: &str = "Failed to fetch videos";

pub struct Dashboard {
    source: Arc<dyn VideoSource>,
    state: SharedViewState,
    reconciler: Reconciler,
}

impl Dashboard {
    pub fn new(source: Arc<dyn VideoSource>, config: &DashboardConfig) -> Self {
        let state = SharedViewState::new();
        let reconciler = Reconciler::new(
            Arc::clone(&source),
            state.clone(),
            config.poll_interval,
            config.poll_error_policy,
        );
        Self {
            source,
            state,
            reconciler,
        }
    }

    pub fn state(&self) -> &SharedViewState {
        &self.state
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Fetch the list, merge it into the view and start polling every video
    /// the merged view still shows as in flight.
    ///
    /// A failure is shown as the page error rather than returned.
    pub async fn load_videos(&self) {
        self.state.set_loading(true).await;
        self.state.set_error(None).await;

        match self.source.list_videos().await {
            Ok(videos) => {
                info!(count = videos.len(), "Loaded videos");
                self.state.set_videos(videos).await;
                // A stale list can lose to a newer polled copy, so track from the merged view
                let merged = self.state.snapshot().await;
                let started = self.reconciler.track_active(merged.videos()).await;
                if started > 0 {
                    info!(started, "Polling videos still in progress");
                }
            }
            Err(e) => {
                error!("Error fetching videos: {}", e);
                self.state.set_error(Some(load_error_message(&e))).await;
            }
        }

        self.state.set_loading(false).await;
    }

    /// Submit a new video. On success it goes to the front of the list and is
    /// polled if still in flight; on failure the proxy's error is returned to
    /// the caller and the view is left untouched.
    pub async fn create_video(&self, request: CreateVideoRequest) -> DashboardResult<Video> {
        let video = self.source.create_video(request).await.map_err(|e| {
            error!("Error creating video: {}", e);
            e
        })?;

        info!(video_id = %video.id, status = video.status_label(), "Video submitted");
        self.state.prepend_video(video.clone()).await;

        if video.is_active() {
            self.reconciler.track(video.id.clone()).await;
        }

        Ok(video)
    }

    /// Wait until `id` is no longer polled, or every video when `None`.
    pub async fn wait_until_settled(&self, id: Option<&VideoId>) {
        match id {
            Some(id) => self.state.wait_for(|s| !s.is_pending(id)).await,
            None => self.state.wait_until_settled().await,
        }
    }

    pub async fn shutdown(&self) {
        self.reconciler.shutdown().await;
    }
}

/// Page error for a failed list load. The proxy's envelope usually already
/// says "Failed to fetch videos"; it is not repeated.
fn load_error_message(err: &DashboardError) -> String {
    match err {
        DashboardError::Rejected { message, .. } if message.starts_with(LOAD_FAILED) => {
            err.to_string()
        }
        _ => format!("{LOAD_FAILED}: {err}"),
    }
}

//! View state: the video list, the pending-id set, loading and error flags.
//!
//! Only [`SharedViewState`] can change a [`ViewState`], and every change bumps
//! a revision counter so renderers can redraw.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use vgen_models::{Video, VideoId};

/// Snapshot of everything the dashboard displays.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    videos: Vec<Video>,
    pending: HashSet<VideoId>,
    loading: bool,
    error: Option<String>,
}

impl ViewState {
    /// Videos in display order.
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn video(&self, id: &VideoId) -> Option<&Video> {
        self.videos.iter().find(|v| &v.id == id)
    }

    /// Ids currently under status polling.
    pub fn pending(&self) -> &HashSet<VideoId> {
        &self.pending
    }

    pub fn is_pending(&self, id: &VideoId) -> bool {
        self.pending.contains(id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last error message, if any. Only the most recent one is kept.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the list with a fresh fetch.
    ///
    /// Last write wins per id: when the local copy of a video carries a newer
    /// `updatedAt` than the incoming one (a poll landed after the list was
    /// read), the local copy is kept.
    pub(crate) fn set_videos(&mut self, incoming: Vec<Video>) {
        let merged = incoming
            .into_iter()
            .map(|fresh| match self.video(&fresh.id) {
                Some(local) if is_newer(local, &fresh) => local.clone(),
                _ => fresh,
            })
            .collect();
        self.videos = merged;
    }

    /// Put a newly created video at the front.
    pub(crate) fn prepend_video(&mut self, video: Video) {
        self.videos.retain(|v| v.id != video.id);
        self.videos.insert(0, video);
    }

    /// Replace the entry with the same id in place. Returns false if the id
    /// is not displayed.
    pub(crate) fn patch_video(&mut self, video: Video) -> bool {
        match self.videos.iter_mut().find(|v| v.id == video.id) {
            Some(slot) => {
                *slot = video;
                true
            }
            None => false,
        }
    }

    /// Returns true if the id was not already pending.
    pub(crate) fn mark_pending(&mut self, id: VideoId) -> bool {
        self.pending.insert(id)
    }

    pub(crate) fn clear_pending(&mut self, id: &VideoId) -> bool {
        self.pending.remove(id)
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

fn is_newer(local: &Video, fresh: &Video) -> bool {
    match (local.updated_secs(), fresh.updated_secs()) {
        (Some(l), Some(f)) => l > f,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Shared handle to the view state.
#[derive(Clone)]
pub struct SharedViewState {
    inner: Arc<RwLock<ViewState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for SharedViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedViewState {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(ViewState::default())),
            revision: Arc::new(revision),
        }
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> ViewState {
        self.inner.read().await.clone()
    }

    /// Receiver that changes on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub async fn is_pending(&self, id: &VideoId) -> bool {
        self.inner.read().await.is_pending(id)
    }

    pub async fn pending_count(&self) -> usize {
        self.inner.read().await.pending.len()
    }

    async fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let result = {
            let mut state = self.inner.write().await;
            f(&mut state)
        };
        self.revision.send_modify(|rev| *rev += 1);
        result
    }

    pub(crate) async fn set_videos(&self, videos: Vec<Video>) {
        self.update(|s| s.set_videos(videos)).await
    }

    pub(crate) async fn prepend_video(&self, video: Video) {
        self.update(|s| s.prepend_video(video)).await
    }

    pub(crate) async fn patch_video(&self, video: Video) -> bool {
        self.update(|s| s.patch_video(video)).await
    }

    pub(crate) async fn mark_pending(&self, id: VideoId) -> bool {
        self.update(|s| s.mark_pending(id)).await
    }

    pub(crate) async fn clear_pending(&self, id: &VideoId) -> bool {
        self.update(|s| s.clear_pending(id)).await
    }

    pub(crate) async fn set_loading(&self, loading: bool) {
        self.update(|s| s.set_loading(loading)).await
    }

    pub(crate) async fn set_error(&self, error: Option<String>) {
        self.update(|s| s.set_error(error)).await
    }

    /// Wait until `done` holds for the state, re-checking after every mutation.
    pub async fn wait_for(&self, mut done: impl FnMut(&ViewState) -> bool) {
        let mut changes = self.subscribe();
        loop {
            if done(&*self.inner.read().await) {
                return;
            }
            if changes.changed().await.is_err() {
                return;
            }
        }
    }

    /// Wait until nothing is being polled.
    pub async fn wait_until_settled(&self) {
        self.wait_for(|s| s.pending.is_empty()).await
    }
}

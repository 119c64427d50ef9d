//! Status reconciliation: poll non-terminal videos until they settle.
//!
//! Each tracked id gets one poll chain. A chain fetches the video, patches it
//! into the view, and either sleeps for the poll interval and goes again
//! (`pending` / `in_progress`) or clears the id from the pending set and ends.
//! Fetch failures are handled by the configured [`PollErrorPolicy`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use vgen_models::{Video, VideoId};

use crate::source::VideoSource;
use crate::state::SharedViewState;

/// Attempts allowed by `retry` when no count is given.
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// What a poll chain does when fetching a video's status fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollErrorPolicy {
    /// Log the failure, drop the id from the pending set and stop polling it.
    #[default]
    Abandon,
    /// Keep polling until `max_attempts` consecutive fetches have failed.
    Retry { max_attempts: u32 },
}

impl PollErrorPolicy {
    /// Whether a chain that has seen `consecutive_failures` failures in a row
    /// should poll again.
    pub fn should_retry(&self, consecutive_failures: u32) -> bool {
        match self {
            PollErrorPolicy::Abandon => false,
            PollErrorPolicy::Retry { max_attempts } => consecutive_failures < *max_attempts,
        }
    }
}

impl fmt::Display for PollErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollErrorPolicy::Abandon => write!(f, "abandon"),
            PollErrorPolicy::Retry { max_attempts } => write!(f, "retry:{}", max_attempts),
        }
    }
}

impl FromStr for PollErrorPolicy {
    type Err = String;

    /// `abandon`, `retry` or `retry:<attempts>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.split_once(':') {
            None if s == "abandon" => Ok(PollErrorPolicy::Abandon),
            None if s == "retry" => Ok(PollErrorPolicy::Retry {
                max_attempts: DEFAULT_RETRY_ATTEMPTS,
            }),
            Some(("retry", n)) => match n.parse::<u32>() {
                Ok(max_attempts) if max_attempts > 0 => Ok(PollErrorPolicy::Retry { max_attempts }),
                _ => Err(format!("invalid retry attempts: {n}")),
            },
            _ => Err(format!("unknown poll error policy: {s}")),
        }
    }
}

/// Runs the poll chains for one view.
pub struct Reconciler {
    source: Arc<dyn VideoSource>,
    state: SharedViewState,
    interval: Duration,
    policy: PollErrorPolicy,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl Reconciler {
    pub fn new(
        source: Arc<dyn VideoSource>,
        state: SharedViewState,
        interval: Duration,
        policy: PollErrorPolicy,
    ) -> Self {
        Self {
            source,
            state,
            interval,
            policy,
            cancel: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn policy(&self) -> PollErrorPolicy {
        self.policy
    }

    /// Start polling `id` unless a chain for it is already running.
    ///
    /// Returns true if a new chain was started.
    pub async fn track(&self, id: VideoId) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if !self.state.mark_pending(id.clone()).await {
            debug!(video_id = %id, "Already polling video");
            return false;
        }

        let chain = PollChain {
            id,
            source: Arc::clone(&self.source),
            state: self.state.clone(),
            interval: self.interval,
            policy: self.policy,
            cancel: self.cancel.child_token(),
        };
        self.tasks.spawn(chain.run());
        true
    }

    /// Track every video that is still pending or in progress.
    ///
    /// Returns the number of chains started.
    pub async fn track_active<'a>(&self, videos: impl IntoIterator<Item = &'a Video>) -> usize {
        let mut started = 0;
        for video in videos.into_iter().filter(|v| v.is_active()) {
            if self.track(video.id.clone()).await {
                started += 1;
            }
        }
        started
    }

    /// Number of chains still running.
    pub fn active_chains(&self) -> usize {
        self.tasks.len()
    }

    /// Cancel every chain and wait for them to finish.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tasks.close();
        self.tasks.wait().await;
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// One id's sequential fetch loop.
struct PollChain {
    id: VideoId,
    source: Arc<dyn VideoSource>,
    state: SharedViewState,
    interval: Duration,
    policy: PollErrorPolicy,
    cancel: CancellationToken,
}

impl PollChain {
    async fn run(self) {
        let mut failures = 0u32;

        loop {
            let fetched = tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(video_id = %self.id, "Polling cancelled");
                    break;
                }
                fetched = self.source.get_video(&self.id) => fetched,
            };

            match fetched {
                Ok(video) => {
                    failures = 0;
                    let active = video.is_active();
                    let status = video.status_label();
                    self.state.patch_video(video).await;

                    if !active {
                        info!(video_id = %self.id, status, "Video settled");
                        break;
                    }
                    debug!(video_id = %self.id, status, "Video still processing");
                }
                Err(e) => {
                    failures += 1;
                    if !self.policy.should_retry(failures) {
                        warn!(
                            video_id = %self.id,
                            failures,
                            "Error polling video status, giving up: {}", e
                        );
                        break;
                    }
                    warn!(
                        video_id = %self.id,
                        failures,
                        "Error polling video status, will retry: {}", e
                    );
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(video_id = %self.id, "Polling cancelled");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.state.clear_pending(&self.id).await;
    }
}

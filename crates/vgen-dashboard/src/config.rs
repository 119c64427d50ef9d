//! Dashboard configuration.

use std::time::Duration;

use crate::reconcile::PollErrorPolicy;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the vgen-api proxy
    pub api_url: String,
    /// Delay between two status fetches of the same video
    pub poll_interval: Duration,
    /// What a poll chain does when a status fetch fails
    pub poll_error_policy: PollErrorPolicy,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            poll_interval: Duration::from_secs(5),
            poll_error_policy: PollErrorPolicy::Abandon,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl DashboardConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("VGEN_API_URL").unwrap_or(defaults.api_url),
            poll_interval: std::env::var("VGEN_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .map(Duration::from_secs_f64)
                .unwrap_or(defaults.poll_interval),
            poll_error_policy: std::env::var("VGEN_POLL_ERROR_POLICY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.poll_error_policy),
            request_timeout: Duration::from_secs(
                std::env::var("VGEN_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.poll_error_policy, PollErrorPolicy::Abandon);
    }
}

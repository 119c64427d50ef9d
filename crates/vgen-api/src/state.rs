//! Application state.

use std::sync::Arc;

use vgen_provider::{ProviderClient, ProviderResult};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub provider: Arc<ProviderClient>,
}

impl AppState {
    /// Create application state around an existing provider client.
    pub fn new(config: ApiConfig, provider: ProviderClient) -> Self {
        Self {
            config,
            provider: Arc::new(provider),
        }
    }

    /// Create application state with a provider client configured from the environment.
    pub fn from_env(config: ApiConfig) -> ProviderResult<Self> {
        Ok(Self::new(config, ProviderClient::from_env()?))
    }
}

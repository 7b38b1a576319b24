//! Application state and shared resources.

use anyhow::Result;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::upstream::UpstreamClient;

/// Shared application state
///
/// Read-only after startup; requests share no mutable data.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Client for the upstream file store, chat endpoint, and image URLs
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Create new application state, building the HTTP clients
    pub fn new(config: AppConfig) -> Result<Self> {
        let upstream = Arc::new(UpstreamClient::new(&config.upstream, config.max_body_bytes)?);

        Ok(Self {
            config: Arc::new(config),
            upstream,
        })
    }
}

//! Configuration management for Glyphgate.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use glyphgate_common::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_LISTEN_ADDR, DEFAULT_MODEL, DEFAULT_UPSTREAM_TIMEOUT_SECS,
    DEFAULT_UPSTREAM_URL,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Largest accepted request body (Base64 and multipart images)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Upstream model endpoint configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Upstream endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL hosting both the file and chat-completion endpoints
    #[serde(default = "default_upstream_url")]
    pub base_url: String,

    /// Model identifier sent with every completion
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout for upload and completion calls
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,

    /// Timeout for downloading caller-supplied image URLs
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// User-Agent sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_url(),
            model: default_model(),
            timeout_secs: default_upstream_timeout(),
            fetch_timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl UpstreamConfig {
    /// Absolute URL for an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

// Default value functions
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_max_body_bytes() -> usize { 20 * 1024 * 1024 } // 20 MiB
fn default_upstream_url() -> String { DEFAULT_UPSTREAM_URL.to_string() }
fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_upstream_timeout() -> u64 { DEFAULT_UPSTREAM_TIMEOUT_SECS }
fn default_fetch_timeout() -> u64 { DEFAULT_FETCH_TIMEOUT_SECS }
fn default_user_agent() -> String { format!("glyphgate/{}", env!("CARGO_PKG_VERSION")) }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(ref url) = args.upstream_url {
            config.upstream.base_url = url.clone();
        }
        if let Some(ref model) = args.model {
            config.upstream.model = model.clone();
        }
        if let Some(secs) = args.upstream_timeout {
            config.upstream.timeout_secs = secs;
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_body_bytes: default_max_body_bytes(),
            upstream: UpstreamConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let upstream = UpstreamConfig {
            base_url: "http://127.0.0.1:9000/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            upstream.endpoint("/api/v1/files/"),
            "http://127.0.0.1:9000/api/v1/files/"
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "listen_addr = \"0.0.0.0:9999\"\n[upstream]\nmodel = \"other-vl\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let parsed: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(parsed.listen_addr, "0.0.0.0:9999");
        assert_eq!(parsed.upstream.model, "other-vl");
        assert_eq!(parsed.upstream.base_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(parsed.upstream.timeout_secs, DEFAULT_UPSTREAM_TIMEOUT_SECS);
    }
}

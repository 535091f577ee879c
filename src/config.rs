//! Client configuration.
//!
//! Defaults mirror the web front-end the service ships with (chunks of 10, at most
//! 100 messages of 1000 characters). Every value can be overridden from the
//! environment or from a YAML file:
//!
//! ```yaml
//! base_url: http://localhost:5000
//! timeout_secs: 15
//! batch:
//!   chunk_size: 5
//! ```

use crate::batch::BatchConfig;
use crate::input::InputPolicy;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub predict_path: String,
    pub health_path: String,
    pub metrics_path: String,
    /// Per-request timeout applied by the HTTP transport.
    pub timeout_secs: u64,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout_secs: u64,
    pub batch: BatchConfig,
    pub input: InputPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: "/predict".to_string(),
            health_path: "/health".to_string(),
            metrics_path: "/metrics".to_string(),
            timeout_secs: 30,
            pool_max_idle_per_host: 32,
            pool_idle_timeout_secs: 90,
            batch: BatchConfig::default(),
            input: InputPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with `SPAMCHECK_*` environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file, then let the environment override it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: ClientConfig = serde_yaml::from_str(&raw)?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.batch.chunk_size = chunk_size;
        self
    }

    /// The timeout is kept in whole seconds; any fraction is rounded up, so the
    /// configured timeout is never shorter than the one asked for.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.timeout_secs = secs.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                "base_url is not a valid URL",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(e.to_string())
                    .with_source("client_config"),
            )
        })?;
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be at least one second",
                ErrorContext::new()
                    .with_field_path("timeout_secs")
                    .with_source("client_config"),
            ));
        }
        self.batch.validate()?;
        self.input.validate()
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("SPAMCHECK_BASE_URL") {
            self.base_url = url;
        }
        if let Some(v) = env_parse("SPAMCHECK_HTTP_TIMEOUT_SECS")? {
            self.timeout_secs = v;
        }
        if let Some(v) = env_parse("SPAMCHECK_HTTP_POOL_MAX_IDLE_PER_HOST")? {
            self.pool_max_idle_per_host = v;
        }
        if let Some(v) = env_parse("SPAMCHECK_BATCH_CHUNK_SIZE")? {
            self.batch.chunk_size = v;
        }
        if let Some(v) = env_parse("SPAMCHECK_MAX_MESSAGES")? {
            self.input.max_messages = v;
        }
        if let Some(v) = env_parse("SPAMCHECK_MAX_MESSAGE_CHARS")? {
            self.input.max_message_chars = v;
        }
        self.validate()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            Error::configuration_with_context(
                format!("{key} is not a valid number"),
                ErrorContext::new()
                    .with_field_path(key)
                    .with_details(raw)
                    .with_source("environment"),
            )
        }),
        Err(_) => Ok(None),
    }
}

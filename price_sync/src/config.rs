//! Application configuration.
//!
//! Loaded from an optional TOML file. Every field has a default, so an empty
//! file (or none at all) is valid:
//!
//! ```toml
//! database_url = "prices.db"
//!
//! [feed]
//! quote_currency = "USD"
//! requests_per_second = 20
//!
//! [ingest]
//! batch_size = 50
//! max_concurrency = 10
//! max_runtime_secs = 14400
//! schedule = "0 0 0 * * *"
//! ```

use std::path::Path;
use std::time::Duration;

use crypto_feed::config::FeedConfig;
use crypto_feed::env::{MissingEnvVarError, get_env_var};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingest::IngestOptions;

/// Environment fallback for [`AppConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no database configured: {0}")]
    MissingDatabase(#[from] MissingEnvVarError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite path or `sqlite:` URL. Falls back to `DATABASE_URL`.
    pub database_url: Option<String>,
    pub feed: FeedConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    pub batch_size: usize,
    pub max_concurrency: usize,
    /// Wall-clock ceiling for one run.
    pub max_runtime_secs: u64,
    /// Six-field cron expression (with seconds), evaluated in UTC.
    pub schedule: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        let opts = IngestOptions::default();
        Self {
            batch_size: opts.batch_size,
            max_concurrency: opts.max_concurrency,
            max_runtime_secs: 4 * 60 * 60,
            schedule: "0 0 0 * * *".to_string(),
        }
    }
}

impl IngestConfig {
    pub fn max_runtime(&self) -> Duration {
        Duration::from_secs(self.max_runtime_secs)
    }
}

impl AppConfig {
    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// The configured database, or `DATABASE_URL`.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        match &self.database_url {
            Some(url) => Ok(url.clone()),
            None => Ok(get_env_var(DATABASE_URL_ENV)?),
        }
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            batch_size: self.ingest.batch_size,
            max_concurrency: self.ingest.max_concurrency,
            history_limit: self.feed.history_limit,
        }
    }
}

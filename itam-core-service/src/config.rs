use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Retry and locking behaviour of the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Extra attempts after a concurrency conflict; 0 disables retrying
    pub max_retries: usize,
    /// Backoff before retry `n` is `n * retry_backoff_ms`
    pub retry_backoff_ms: u64,
    /// Longest wait for a transaction to start
    pub lock_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff_ms: 25,
            lock_timeout_ms: 2000,
        }
    }
}

impl EngineConfig {
    /// Reads `ITAM_MAX_RETRIES`, `ITAM_RETRY_BACKOFF_MS` and `ITAM_LOCK_TIMEOUT_MS`,
    /// falling back to the defaults for unset variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            max_retries: env_or("ITAM_MAX_RETRIES", defaults.max_retries)?,
            retry_backoff_ms: env_or("ITAM_RETRY_BACKOFF_MS", defaults.retry_backoff_ms)?,
            lock_timeout_ms: env_or("ITAM_LOCK_TIMEOUT_MS", defaults.lock_timeout_ms)?,
        })
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

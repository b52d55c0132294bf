//! Run configuration.
//!
//! Holds the process-level settings the pipeline consumes. Values are
//! gathered by the CLI layer from flags and their environment fallbacks.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Settings that shape a single secret-injection run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of fetch-engine workers.
    pub workers: usize,
    /// Export every resolved secret into the process environment.
    pub secret_env: bool,
    /// Consolidated JSON payload file, if any.
    pub payload_path: Option<PathBuf>,
}

impl Config {
    /// Create a configuration with defaults and no output sinks enabled.
    pub fn new() -> Self {
        Self {
            workers: constants::DEFAULT_WORKERS,
            secret_env: false,
            payload_path: None,
        }
    }

    /// Whether a sink that accepts every definition is enabled.
    ///
    /// When neither env export nor a payload file is configured, a
    /// definition without its own destination file has nowhere to go.
    pub fn has_global_sink(&self) -> bool {
        self.secret_env || self.payload_path.is_some()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoWorkers` if the worker count is zero.
    pub fn validate(&self) -> Result<()> {
        debug!(
            workers = self.workers,
            secret_env = self.secret_env,
            payload = ?self.payload_path,
            "validating config"
        );

        if self.workers == 0 {
            return Err(ConfigError::NoWorkers.into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection settings for the secret store.
#[derive(Clone)]
pub struct StoreSettings {
    /// Base URL, e.g. `https://vault.example.com:8200`.
    pub address: String,
    /// Store token, wiped from memory on drop.
    pub token: Zeroizing<String>,
    /// Per-call HTTP timeout.
    pub timeout: Duration,
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StoreSettings {
    /// Build settings, rejecting an empty token.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` if `token` is empty.
    pub fn new(address: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken.into());
        }

        Ok(Self {
            address: address.into().trim_end_matches('/').to_string(),
            token,
            timeout,
        })
    }
}

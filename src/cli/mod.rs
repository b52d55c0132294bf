//! Command-line interface.

pub mod output;

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::Parser;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::config::{Config, StoreSettings};
use crate::core::constants;
use crate::core::entrypoint;
use crate::core::orchestrator;
use crate::core::resolver::EnvSnapshot;
use crate::core::sink::ProcessEnv;
use crate::core::store::VaultClient;
use crate::error::{ConfigError, Result};

/// Daytona - inject secrets from Vault into files and the environment.
#[derive(Parser)]
#[command(
    name = "daytona",
    about = "Inject secrets from Vault into files and the process environment",
    version,
    after_help = "Secrets are discovered from VAULT_SECRET_<ID> and VAULT_SECRETS_<ID> variables;\n\
                  DAYTONA_SECRET_DESTINATION_<ID> names an output file for <ID>."
)]
pub struct Cli {
    /// Vault address
    #[arg(long, env = "VAULT_ADDR", default_value = constants::DEFAULT_ADDRESS)]
    pub address: String,

    /// Vault token
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true, value_parser = parse_token)]
    pub token: Option<Zeroizing<String>>,

    /// Number of parallel secret reads
    #[arg(long, env = "VAULT_WORKERS", default_value_t = constants::DEFAULT_WORKERS)]
    pub workers: usize,

    /// Export secrets into the environment (inherited by the entrypoint)
    #[arg(long, env = "SECRET_ENV", value_parser = BoolishValueParser::new())]
    pub secret_env: bool,

    /// Write all secrets as one JSON object to this file
    #[arg(long, env = "SECRET_PATH")]
    pub secret_path: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "VAULT_TIMEOUT", default_value_t = constants::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Command to run once secrets are in place
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

fn parse_token(raw: &str) -> std::result::Result<Zeroizing<String>, Infallible> {
    Ok(Zeroizing::new(raw.to_string()))
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("workers", &self.workers)
            .field("secret_env", &self.secret_env)
            .field("secret_path", &self.secret_path)
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl Cli {
    /// Pipeline configuration selected by the flags.
    pub fn config(&self) -> Config {
        Config {
            workers: self.workers,
            secret_env: self.secret_env,
            payload_path: self.secret_path.clone(),
        }
    }

    /// Store connection settings selected by the flags.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` if no token was given.
    pub fn store_settings(&self) -> Result<StoreSettings> {
        let token = self.token.as_ref().ok_or(ConfigError::MissingToken)?;
        StoreSettings::new(
            self.address.as_str(),
            token.as_str(),
            Duration::from_secs(self.timeout),
        )
    }
}

/// Run the secret-injection pipeline, then the entrypoint if one was given.
///
/// # Returns
///
/// The process exit code.
pub fn execute(cli: Cli) -> Result<i32> {
    let env = EnvSnapshot::from_process();
    let config = cli.config();
    config.validate()?;

    let settings = cli.store_settings()?;
    debug!(?settings, "connecting to secret store");
    let store = Arc::new(VaultClient::new(&settings)?);

    orchestrator::run(store, &env, &config, &mut ProcessEnv)?;

    entrypoint::run(&cli.command)
}

//! Terminal output helpers for the few lines printed outside of logging.
//!
//! Color scheme (respects NO_COLOR and non-tty stderr):
//! - Red: errors
//! - Cyan: hints

use console::style;

use crate::error::{ConfigError, DefinitionError, Error, StoreError};

/// Print an error message to stderr (red).
///
/// Example: `✗ no secrets found under: secret/app`
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().for_stderr(), msg);
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ set VAULT_TOKEN or pass --token`
pub fn hint(msg: &str) {
    eprintln!(
        "{} {}",
        style("→").cyan().for_stderr(),
        style(msg).cyan().for_stderr()
    );
}

/// Suggested next step for an error, if there is an obvious one.
pub fn suggestion(err: &Error) -> Option<&'static str> {
    match err {
        Error::Config(ConfigError::MissingToken) => Some("set VAULT_TOKEN or pass --token"),
        Error::Config(ConfigError::InsecureAddress(_)) => {
            Some("use an https:// VAULT_ADDR for remote stores")
        }
        Error::Config(ConfigError::AddressCredentials) => {
            Some("remove the user@ part from VAULT_ADDR")
        }
        Error::Store(StoreError::Unauthorized)
        | Error::Definition(DefinitionError::ListFailed {
            source: StoreError::Unauthorized,
            ..
        })
        | Error::Definition(DefinitionError::ReadFailed {
            source: StoreError::Unauthorized,
            ..
        }) => Some("check that the token's policy allows read and list on these paths"),
        Error::Definition(DefinitionError::NoSecretsFound(_)) => {
            Some("check the VAULT_SECRETS_<ID> path, it must name a parent with children")
        }
        _ => None,
    }
}

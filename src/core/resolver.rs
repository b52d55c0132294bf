//! Definition discovery.
//!
//! Scans an environment snapshot for secret-reference variables, pairs
//! each with its destination file, and drops definitions that have no
//! way to emit their secrets.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::constants;
use crate::core::definition::Definition;

/// Environment variables captured once at startup.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: Vec<(String, String)>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Build a snapshot from explicit pairs, preserving their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All variables in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Find the destination file for `secret_id`.
///
/// Tries `DAYTONA_SECRET_DESTINATION_<id>` as given, then lowercased, then
/// uppercased, returning the first non-empty value. Casing of the
/// destination variable is not always preserved by the environment it was
/// declared in.
pub fn destination_for(env: &EnvSnapshot, secret_id: &str) -> Option<PathBuf> {
    [
        secret_id.to_string(),
        secret_id.to_lowercase(),
        secret_id.to_uppercase(),
    ]
    .iter()
    .map(|id| format!("{}{}", constants::DESTINATION_PREFIX, id))
    .find_map(|key| env.get(&key).filter(|v| !v.is_empty()).map(PathBuf::from))
}

/// Discover every usable definition in `env`, in snapshot order.
///
/// A definition without a destination is skipped when neither env export
/// nor a payload file is configured.
pub fn discover(env: &EnvSnapshot, config: &Config) -> Vec<Definition> {
    let mut definitions = Vec::new();

    for (key, value) in env.iter() {
        let Some(mut def) = Definition::from_env(key, value) else {
            continue;
        };
        def.destination = destination_for(env, &def.secret_id);

        if def.destination.is_none() && !config.has_global_sink() {
            warn!(
                "No secret output method was configured for {}, will not attempt to retrieve secrets for this definition",
                def.env_key
            );
            continue;
        }

        info!(
            env_key = %def.env_key,
            apex = %def.apex,
            plural = def.plural,
            destination = ?def.destination,
            "found secret definition"
        );
        definitions.push(def);
    }

    debug!(count = definitions.len(), "discovery finished");
    definitions
}

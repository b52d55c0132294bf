//! Secret-injection pipeline.
//!
//! Drives discovery, feeds the fetch engine one definition at a time,
//! merges results, then hands every definition to the output sinks.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::definition::Definition;
use crate::core::fetch::ParallelReader;
use crate::core::resolver::{self, EnvSnapshot};
use crate::core::sink::{self, EnvSink};
use crate::core::store::SecretStore;
use crate::error::{FetchError, Result};

/// Discover definitions in `env` and fill their secrets from `store`.
///
/// Definitions are processed in discovery order. Each one is submitted
/// and drained as a closed batch before the next starts.
///
/// # Errors
///
/// Returns the first configuration, expansion, or read failure; no
/// further definitions are processed after it.
pub fn fetch_secrets(
    store: Arc<dyn SecretStore>,
    env: &EnvSnapshot,
    config: &Config,
) -> Result<Vec<Definition>> {
    config.validate()?;
    info!("Starting secret fetch");

    let mut definitions = resolver::discover(env, config);
    let mut reader = ParallelReader::open(Arc::clone(&store), config.workers)?;

    for (owner, def) in definitions.iter_mut().enumerate() {
        if def.plural {
            def.walk(store.as_ref())?;
        }

        for path in &def.paths {
            reader.submit(owner, path.clone());
        }
        collect_batch(&mut reader, owner, def)?;

        debug!(definition = %def.env_key, secrets = def.secrets.len(), "definition resolved");
    }

    Ok(definitions)
}

/// Drain exactly one result per path of `def` and merge each into it.
///
/// Every result must carry `owner`; anything else means requests from
/// another batch are still in flight.
fn collect_batch(reader: &mut ParallelReader, owner: usize, def: &mut Definition) -> Result<()> {
    for _ in 0..def.paths.len() {
        let result = reader
            .next()
            .ok_or_else(|| FetchError::Stopped(def.env_key.clone()))?;

        if result.owner != owner {
            return Err(FetchError::Misattributed {
                path: result.path,
                owner: result.owner,
                expected: owner,
            }
            .into());
        }
        def.add_secrets(result)?;
    }
    Ok(())
}

/// Send every definition to its configured sinks.
///
/// The payload file accumulates all definitions' secrets (later
/// definitions win on key collisions) and is written once at the end.
///
/// # Errors
///
/// Returns the first serialization or write failure.
pub fn dispatch(definitions: &[Definition], config: &Config, env: &mut dyn EnvSink) -> Result<()> {
    let mut payload = BTreeMap::new();

    for def in definitions {
        if config.secret_env {
            sink::export_env(&def.secrets, env);
        }

        sink::write_destination(def)?;

        if config.payload_path.is_some() {
            payload.extend(def.secrets.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    if let Some(path) = &config.payload_path {
        sink::write_json(&payload, path)?;
    }

    Ok(())
}

/// Run the whole pipeline: fetch, then dispatch.
///
/// # Errors
///
/// Returns the first failure from either phase.
pub fn run(
    store: Arc<dyn SecretStore>,
    env: &EnvSnapshot,
    config: &Config,
    env_sink: &mut dyn EnvSink,
) -> Result<Vec<Definition>> {
    let definitions = fetch_secrets(store, env, config)?;
    dispatch(&definitions, config, env_sink)?;
    info!(definitions = definitions.len(), "secret fetch complete");
    Ok(definitions)
}

//! Output sinks.
//!
//! Resolved secrets leave the process through three independent sinks:
//! the process environment, a per-definition destination file, and a
//! consolidated JSON payload file.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::core::definition::{key_name, Definition};
use crate::error::{OutputError, Result};

/// Capability to mutate process-wide environment state.
pub trait EnvSink {
    /// Set `key` to `value`.
    fn set(&mut self, key: &str, value: &str);
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSink for ProcessEnv {
    fn set(&mut self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}

/// Whether `key`/`value` can be stored as an environment variable.
fn valid_env_pair(key: &str, value: &str) -> bool {
    !key.is_empty() && !key.contains('=') && !key.contains('\0') && !value.contains('\0')
}

/// Export every secret through `sink`.
///
/// Pairs that cannot be represented in an environment are skipped.
///
/// # Returns
///
/// Number of variables set.
pub fn export_env(secrets: &BTreeMap<String, String>, sink: &mut dyn EnvSink) -> usize {
    let mut count = 0;
    for (key, value) in secrets {
        if !valid_env_pair(key, value) {
            warn!(key = %key, "secret cannot be exported as an environment variable, skipping");
            continue;
        }
        sink.set(key, value);
        info!("Set env var: {}", key);
        count += 1;
    }
    count
}

/// Write `contents` to `path` readable and writable by the owner only.
///
/// # Errors
///
/// Returns `OutputError::Write` if the file cannot be written.
pub fn write_secure(path: &Path, contents: &[u8]) -> Result<()> {
    let wrap = |source| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    #[cfg(unix)]
    {
        use crate::core::constants::SECRET_FILE_MODE;
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .mode(SECRET_FILE_MODE)
            .open(path)
            .map_err(wrap)?;
        file.write_all(contents).map_err(wrap)?;
        file.flush().map_err(wrap)?;

        // Tighten permissions on files that already existed.
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(SECRET_FILE_MODE))
            .map_err(wrap)?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, contents).map_err(wrap)?;
    }

    Ok(())
}

/// Serialize `secrets` as a JSON object and write it to `path`.
///
/// # Errors
///
/// Returns `OutputError` if serialization or the write fails.
pub fn write_json(secrets: &BTreeMap<String, String>, path: &Path) -> Result<()> {
    let payload = serde_json::to_vec(secrets).map_err(OutputError::Serialize)?;
    write_secure(path, &payload)?;
    info!("Wrote {} secrets to {}", secrets.len(), path.display());
    Ok(())
}

/// Write a definition to its destination file, if it has one.
///
/// Plural definitions write their whole secret map as JSON. Singular
/// definitions write the raw value: the one stored under the path's
/// friendly name when present, otherwise the last value in key order.
///
/// # Errors
///
/// Returns `OutputError` if serialization or the write fails.
pub fn write_destination(def: &Definition) -> Result<()> {
    let Some(destination) = def.destination.as_deref() else {
        return Ok(());
    };

    if def.plural {
        return write_json(&def.secrets, destination);
    }

    let value = def
        .secrets
        .get(key_name(&def.apex))
        .or_else(|| def.secrets.values().next_back());

    match value {
        Some(value) => {
            write_secure(destination, value.as_bytes())?;
            info!("Wrote secret to {}", destination.display());
        }
        None => warn!(
            definition = %def.env_key,
            "no secret value resolved, not writing {}",
            destination.display()
        ),
    }

    Ok(())
}

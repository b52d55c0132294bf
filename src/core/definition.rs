//! Secret definitions.
//!
//! A definition is one `VAULT_SECRET_<ID>` or `VAULT_SECRETS_<ID>`
//! variable: where its secrets live in the store, which concrete paths
//! to read, where the result goes, and the secrets resolved so far.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::constants;
use crate::core::fetch::FetchResult;
use crate::core::store::SecretStore;
use crate::error::{DefinitionError, Result};

/// A secret reference discovered in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Originating variable name, e.g. `VAULT_SECRET_API`.
    pub env_key: String,
    /// Variable name without its prefix, e.g. `API`.
    pub secret_id: String,
    /// Store path the variable points at.
    pub apex: String,
    /// Whether `apex` is a parent whose children are all read.
    pub plural: bool,
    /// Concrete store paths to read. Empty for a plural definition until walked.
    pub paths: Vec<String>,
    /// Output file, if a destination variable was set.
    pub destination: Option<PathBuf>,
    /// Resolved secrets keyed by friendly name.
    pub secrets: BTreeMap<String, String>,
}

impl Definition {
    /// Classify an environment variable.
    ///
    /// Returns `None` for variables without a recognized prefix or with an
    /// empty value.
    pub fn from_env(key: &str, value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }

        let (secret_id, plural) = if let Some(id) = key.strip_prefix(constants::SECRET_PREFIX) {
            (id, false)
        } else if let Some(id) = key.strip_prefix(constants::SECRETS_PREFIX) {
            (id, true)
        } else {
            return None;
        };

        let paths = if plural {
            Vec::new()
        } else {
            vec![value.to_string()]
        };

        Some(Self {
            env_key: key.to_string(),
            secret_id: secret_id.to_string(),
            apex: value.to_string(),
            plural,
            paths,
            destination: None,
            secrets: BTreeMap::new(),
        })
    }

    /// Expand a plural definition's apex into one path per listed child.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError` if the listing fails, is empty, is not a
    /// `keys` sequence, or contains a non-string entry. `paths` is left
    /// untouched on error.
    pub fn walk(&mut self, store: &dyn SecretStore) -> Result<()> {
        let listing = store
            .list(&self.apex)
            .map_err(|source| DefinitionError::ListFailed {
                apex: self.apex.clone(),
                source,
            })?;

        let listing = match listing {
            Some(listing) if !listing.is_empty() => listing,
            _ => return Err(DefinitionError::NoSecretsFound(self.apex.clone()).into()),
        };
        info!("Starting iteration on {}", self.apex);

        let keys = match listing.get(constants::LISTING_KEYS) {
            Some(Value::Array(keys)) => keys,
            _ => {
                return Err(DefinitionError::MalformedListing {
                    apex: self.apex.clone(),
                    payload: Value::Object(listing.clone()).to_string(),
                }
                .into())
            }
        };

        let mut paths: Vec<String> = Vec::with_capacity(keys.len());
        for entry in keys {
            let key = entry.as_str().ok_or_else(|| DefinitionError::NonStringKey {
                apex: self.apex.clone(),
                entry: entry.to_string(),
            })?;

            let path = join_path(&self.apex, key);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(DefinitionError::NoSecretsFound(self.apex.clone()).into());
        }

        debug!(apex = %self.apex, count = paths.len(), "expanded definition");
        self.paths = paths;
        Ok(())
    }

    /// Merge one fetch result into `secrets`.
    ///
    /// The attribute named `value` is stored under the path's final
    /// segment; any other attribute `a` is stored under `<segment>_<a>`.
    /// Later writes win on key collisions.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::ReadFailed` if the read failed,
    /// `DefinitionError::ListedButMissing` if nothing was found at the path,
    /// or `DefinitionError::NonStringValue` for a non-string attribute.
    pub fn add_secrets(&mut self, result: FetchResult) -> Result<()> {
        let FetchResult { path, outcome, .. } = result;
        let name = key_name(&path).to_string();

        let attributes = match outcome {
            Ok(Some(attributes)) => attributes,
            Ok(None) => {
                return Err(DefinitionError::ListedButMissing { key: name, path }.into());
            }
            Err(source) => return Err(DefinitionError::ReadFailed { path, source }.into()),
        };

        for (attribute, value) in attributes {
            let value = match value {
                Value::String(s) => s,
                _ => {
                    return Err(DefinitionError::NonStringValue {
                        path: path.clone(),
                        attribute,
                    }
                    .into())
                }
            };

            let key = if attribute == constants::DEFAULT_KEY_NAME {
                name.clone()
            } else {
                format!("{}_{}", name, attribute)
            };

            if self.secrets.insert(key.clone(), value).is_some() {
                warn!(definition = %self.env_key, key = %key, "secret key collision, keeping last value");
            }
        }

        Ok(())
    }
}

/// Final segment of a store path, ignoring trailing slashes.
pub fn key_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Join a listed child name onto its parent path.
fn join_path(apex: &str, key: &str) -> String {
    let apex = apex.trim_end_matches('/');
    let key = key.trim_matches('/');
    if apex.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", apex, key)
    }
}

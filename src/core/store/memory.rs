//! In-memory secret store.
//!
//! Backs tests and local dry runs. Paths are normalized by trimming
//! surrounding slashes, and every read is recorded.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{Map, Value};

use super::{Attributes, Listing, SecretStore};
use crate::error::StoreError;

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

/// Secret store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: HashMap<String, Attributes>,
    listings: HashMap<String, Listing>,
    failures: HashMap<String, u16>,
    reads: Mutex<Vec<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store attributes at `path`.
    pub fn with_secret(mut self, path: &str, attributes: Value) -> Self {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.secrets.insert(normalize(path), attributes);
        self
    }

    /// Store a well-formed listing of `keys` under `path`.
    pub fn with_keys(self, path: &str, keys: &[&str]) -> Self {
        self.with_listing(path, serde_json::json!({ "keys": keys }))
    }

    /// Store a raw listing payload under `path`.
    pub fn with_listing(mut self, path: &str, listing: Value) -> Self {
        let listing = match listing {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.listings.insert(normalize(path), listing);
        self
    }

    /// Make every call touching `path` fail with the given HTTP-like status.
    pub fn with_failure(mut self, path: &str, status: u16) -> Self {
        self.failures.insert(normalize(path), status);
        self
    }

    /// Paths read so far, in call order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn check_failure(&self, path: &str) -> Result<(), StoreError> {
        match self.failures.get(path) {
            Some(401) | Some(403) => Err(StoreError::Unauthorized),
            Some(429) => Err(StoreError::RateLimited),
            Some(&status) if status >= 500 => Err(StoreError::ServerError(status)),
            Some(&status) => Err(StoreError::UnexpectedStatus(status)),
            None => Ok(()),
        }
    }
}

impl SecretStore for MemoryStore {
    fn read(&self, path: &str) -> Result<Option<Attributes>, StoreError> {
        let path = normalize(path);
        if let Ok(mut reads) = self.reads.lock() {
            reads.push(path.clone());
        }
        self.check_failure(&path)?;
        Ok(self.secrets.get(&path).cloned())
    }

    fn list(&self, path: &str) -> Result<Option<Listing>, StoreError> {
        let path = normalize(path);
        self.check_failure(&path)?;
        Ok(self.listings.get(&path).cloned())
    }
}

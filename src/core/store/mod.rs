//! Secret store access.
//!
//! Abstracts the two calls the pipeline needs from a Vault-compatible
//! key-value store so the fetch engine and resolver can run against a real
//! HTTP backend or an in-memory one.
//!
//! ## Adding a New Store Backend
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file (e.g., `consul.rs`)
//! 3. Re-export from this module
//!
//! ## Example
//!
//! ```ignore
//! struct Consul { /* ... */ }
//!
//! impl SecretStore for Consul {
//!     fn read(&self, path: &str) -> Result<Option<Attributes>, StoreError> {
//!         // GET the key
//!     }
//!     fn list(&self, path: &str) -> Result<Option<Listing>, StoreError> {
//!         // list children of the key
//!     }
//! }
//! ```

use serde_json::{Map, Value};

use crate::error::StoreError;

mod http;
mod memory;

pub use http::VaultClient;
pub use memory::MemoryStore;

/// Attributes stored at a secret path (the `data` object of a read).
pub type Attributes = Map<String, Value>;

/// Raw listing payload (the `data` object of a list, holding `keys`).
pub type Listing = Map<String, Value>;

/// Secret store trait.
///
/// Implementations must be shareable across fetch-engine workers.
pub trait SecretStore: Send + Sync {
    /// Read the attributes stored at `path`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if nothing exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store could not be queried.
    fn read(&self, path: &str) -> Result<Option<Attributes>, StoreError>;

    /// List the children of `path`.
    ///
    /// The payload is returned unvalidated; callers check that it carries
    /// a `keys` sequence of strings.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if `path` has no children.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store could not be queried.
    fn list(&self, path: &str) -> Result<Option<Listing>, StoreError>;
}

//! Constants used throughout daytona.
//!
//! Centralizes environment-variable naming conventions and defaults.

/// Prefix of a variable naming a single secret path (`VAULT_SECRET_<ID>`).
pub const SECRET_PREFIX: &str = "VAULT_SECRET_";

/// Prefix of a variable naming a parent path to expand (`VAULT_SECRETS_<ID>`).
pub const SECRETS_PREFIX: &str = "VAULT_SECRETS_";

/// Prefix of the companion variable holding a definition's output file.
pub const DESTINATION_PREFIX: &str = "DAYTONA_SECRET_DESTINATION_";

/// Attribute stored under the bare friendly key name.
pub const DEFAULT_KEY_NAME: &str = "value";

/// Key of the child-name sequence in a listing payload.
pub const LISTING_KEYS: &str = "keys";

/// Default store address.
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:8200";

/// Default fetch-engine worker count.
pub const DEFAULT_WORKERS: usize = 5;

/// Default per-call store timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Mode of every file daytona writes (owner read/write).
pub const SECRET_FILE_MODE: u32 = 0o600;

//! Daytona - inject secrets from Vault into an application's runtime.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── mod           # Flags, env fallbacks, execute
//! │   └── output        # Error and hint rendering
//! └── core/             # Core library components
//!     ├── config        # Run and store settings
//!     ├── constants     # Variable prefixes and defaults
//!     ├── store/        # Secret store backends
//!     │   ├── mod       # SecretStore trait
//!     │   ├── http      # Vault HTTP client
//!     │   └── memory    # In-memory store
//!     ├── fetch         # Parallel read engine
//!     ├── definition    # Secret definitions, walk and merge
//!     ├── resolver      # Environment scan and destinations
//!     ├── sink          # Env, file and payload outputs
//!     ├── orchestrator  # Fetch and dispatch pipeline
//!     └── entrypoint    # Run a command after injection
//! ```
//!
//! # Environment conventions
//!
//! - `VAULT_SECRET_<ID>=<path>` reads one secret.
//! - `VAULT_SECRETS_<ID>=<path>` reads every child of `<path>`.
//! - `DAYTONA_SECRET_DESTINATION_<ID>=<file>` writes `<ID>`'s secrets to `<file>`.

pub mod cli;
pub mod core;
pub mod error;

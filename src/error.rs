//! Error types for daytona.
//!
//! Every fallible operation returns [`Result`]; only the binary decides
//! to terminate the process.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("no store token configured (set VAULT_TOKEN or pass --token)")]
    MissingToken,

    #[error("invalid store address: {0}")]
    InvalidAddress(#[source] url::ParseError),

    #[error("invalid store address '{0}': only https:// is allowed (http:// for localhost only)")]
    InsecureAddress(String),

    #[error("store address must not embed credentials; pass the token with VAULT_TOKEN")]
    AddressCredentials,
}

/// Failures talking to the secret store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("network error communicating with the secret store: {0}")]
    Network(#[source] reqwest::Error),

    #[error("secret store denied access (check token permissions)")]
    Unauthorized,

    #[error("secret store rate limit exceeded")]
    RateLimited,

    #[error("secret store server error (status {0})")]
    ServerError(u16),

    #[error("unexpected secret store response: status {0}")]
    UnexpectedStatus(u16),

    #[error("could not decode secret store response: {0}")]
    InvalidResponse(String),
}

/// Failures of the fetch engine itself, as opposed to individual reads.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("fetch engine stopped before returning all results for {0}")]
    Stopped(String),

    #[error("read of '{path}' was submitted for definition #{owner} but collected for #{expected}")]
    Misattributed {
        path: String,
        owner: usize,
        expected: usize,
    },
}

/// Failures resolving or filling a secret definition.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("there was a problem listing {apex}: {source}")]
    ListFailed {
        apex: String,
        #[source]
        source: StoreError,
    },

    #[error("no secrets found under: {0}")]
    NoSecretsFound(String),

    #[error("unexpected listing format under {apex}: {payload}")]
    MalformedListing { apex: String, payload: String },

    #[error("non-string secret name under {apex}: {entry}")]
    NonStringKey { apex: String, entry: String },

    #[error("failed retrieving secret {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("store listed a secret '{key}', but got not-found trying to read it at '{path}'")]
    ListedButMissing { key: String, path: String },

    #[error("secret attribute '{attribute}' at '{path}' is not a string")]
    NonStringValue { path: String, attribute: String },
}

/// Failures emitting secrets to an output sink.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to convert secrets payload to json: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not write secrets to file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

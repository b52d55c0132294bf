//! HTTP client for the Vault logical API.
//!
//! Reads and lists raw `data` payloads; KV v2 mounts therefore surface
//! their nested `data`/`metadata` objects unchanged.

use std::fmt;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::trace;
use url::{Host, Url};
use zeroize::Zeroizing;

use super::{Attributes, Listing, SecretStore};
use crate::core::config::StoreSettings;
use crate::error::{ConfigError, Result, StoreError};

/// Parse a store address.
///
/// `https://` is accepted for any host, `http://` only for a loopback host.
/// Addresses carrying userinfo are refused, since the host they appear to
/// name is not the host the request goes to.
fn parse_address(address: &str) -> Result<Url> {
    let url = Url::parse(address).map_err(ConfigError::InvalidAddress)?;

    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::AddressCredentials.into());
    }

    let loopback = match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost",
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    };

    let allowed = match url.scheme() {
        "https" => true,
        "http" => loopback,
        _ => false,
    };
    if !allowed {
        return Err(ConfigError::InsecureAddress(address.to_string()).into());
    }

    Ok(url)
}

/// Pull the `data` object out of a response body.
fn data_object(body: Value) -> std::result::Result<Option<Attributes>, StoreError> {
    match body {
        Value::Object(mut root) => match root.remove("data") {
            Some(Value::Object(data)) => Ok(Some(data)),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(StoreError::InvalidResponse(format!(
                "'data' is not an object: {}",
                other
            ))),
        },
        other => Err(StoreError::InvalidResponse(format!(
            "response body is not an object: {}",
            other
        ))),
    }
}

/// Vault REST API client.
#[derive(Clone)]
pub struct VaultClient {
    http: Client,
    address: Url,
    token: Zeroizing<String>,
}

impl fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultClient")
            .field("address", &self.address.as_str())
            .finish_non_exhaustive()
    }
}

impl VaultClient {
    fn user_agent() -> String {
        format!("daytona/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Create a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unparseable address, one with
    /// embedded credentials, or a non-TLS remote address, and
    /// `StoreError::Network` if the HTTP client cannot be built.
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        let address = parse_address(&settings.address)?;

        let http = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(StoreError::Network)?;

        Ok(Self {
            http,
            address,
            token: settings.token.clone(),
        })
    }

    /// `{address}/v1/{path}`, one percent-encoded segment per path component.
    fn endpoint(&self, path: &str, list: bool) -> Url {
        let mut url = self.address.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("v1")
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        if list {
            url.query_pairs_mut().append_pair("list", "true");
        }
        url
    }

    fn get(&self, path: &str, list: bool) -> std::result::Result<Option<Attributes>, StoreError> {
        let url = self.endpoint(path, list);
        trace!(%url, list, "store request");

        let resp = self
            .http
            .get(url)
            .header("X-Vault-Token", self.token.as_str())
            .header("Accept", "application/json")
            .send()
            .map_err(StoreError::Network)?;

        match resp.status().as_u16() {
            200 => {
                let body = resp.json::<Value>().map_err(StoreError::Network)?;
                data_object(body)
            }
            204 | 404 => Ok(None),
            401 | 403 => Err(StoreError::Unauthorized),
            429 => Err(StoreError::RateLimited),
            status @ 500..=599 => Err(StoreError::ServerError(status)),
            other => Err(StoreError::UnexpectedStatus(other)),
        }
    }
}

impl SecretStore for VaultClient {
    fn read(&self, path: &str) -> std::result::Result<Option<Attributes>, StoreError> {
        self.get(path, false)
    }

    fn list(&self, path: &str) -> std::result::Result<Option<Listing>, StoreError> {
        self.get(path, true)
    }
}

//! Test support utilities for daytona integration tests.
//!
//! Provides an isolated output directory, a fake Vault HTTP API, and a
//! preconfigured `daytona` command.

#![allow(dead_code)]

pub mod assertions;

#[allow(unused_imports)]
pub use assertions::*;

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token every command and mock agrees on.
pub const TOKEN: &str = "s.integration";

/// Test environment with an isolated temp directory and a fake Vault.
pub struct Test {
    /// Temporary directory for output files
    pub dir: TempDir,
    /// Fake Vault server
    pub vault: MockServer,
}

impl Test {
    /// Create a new test environment with an empty fake Vault.
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let vault = MockServer::start().await;
        Self { dir, vault }
    }

    /// Path of a file inside the temp directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Path of a file inside the temp directory, as a string.
    pub fn path_str(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }

    /// Create a daytona command pointed at the fake Vault.
    ///
    /// The inherited environment is cleared so only the variables a test
    /// sets are visible to secret discovery.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("daytona").expect("failed to find daytona binary");
        cmd.env_clear();
        if let Ok(path) = std::env::var("PATH") {
            cmd.env("PATH", path);
        }
        cmd.env("VAULT_ADDR", self.vault.uri());
        cmd.env("VAULT_TOKEN", TOKEN);
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Serve `attributes` as the secret at `secret_path`.
    pub async fn secret(&self, secret_path: &str, attributes: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/{}", secret_path)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": attributes })),
            )
            .mount(&self.vault)
            .await;
    }

    /// Serve a listing of `keys` under `secret_path`.
    pub async fn listing(&self, secret_path: &str, keys: &[&str]) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/{}", secret_path)))
            .and(query_param("list", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "data": { "keys": keys } })),
            )
            .with_priority(1)
            .mount(&self.vault)
            .await;
    }

    /// Respond to every request for `secret_path` with `status`.
    pub async fn status(&self, secret_path: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/{}", secret_path)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.vault)
            .await;
    }

    /// Fail the test if any request reaches the fake Vault.
    pub async fn expect_no_requests(&self) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.vault)
            .await;
    }
}

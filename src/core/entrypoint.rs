//! Entrypoint execution.
//!
//! Runs a command after secrets are injected so it inherits the exported
//! environment.

use std::process::Command;

use tracing::info;

use crate::error::{OutputError, Result};

/// Run `command` and wait for it.
///
/// # Returns
///
/// The child's exit code, `1` if it was terminated by a signal, or `0`
/// when `command` is empty.
///
/// # Errors
///
/// Returns `OutputError::Spawn` if the program cannot be started.
pub fn run(command: &[String]) -> Result<i32> {
    let Some((program, args)) = command.split_first() else {
        return Ok(0);
    };

    info!("Executing entrypoint: {}", program);
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| OutputError::Spawn {
            command: program.clone(),
            source,
        })?;

    Ok(status.code().unwrap_or(1))
}

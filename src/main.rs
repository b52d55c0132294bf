//! Daytona - inject secrets from Vault into files and the environment.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use daytona::cli::output;
use daytona::cli::{execute, Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("DAYTONA_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("daytona=debug")
        } else {
            EnvFilter::new("daytona=info")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }

    match execute(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}", e);
            output::error(&e.to_string());
            if let Some(hint) = output::suggestion(&e) {
                output::hint(hint);
            }
            std::process::exit(1);
        }
    }
}

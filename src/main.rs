//! spec-contrib CLI entrypoint: caches repository activity and prints the
//! commentary ranking and acknowledgements.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use spec_contrib::{FetchError, SpecContribConfig};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), FetchError> {
    let config = load_config()?;
    cli::run::run(&config).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`FetchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<SpecContribConfig, FetchError> {
    SpecContribConfig::load().map_err(|error| FetchError::Configuration {
        message: error.to_string(),
    })
}

//! Estate CLI library
//!
//! Argument parsing, configuration loading, log filter resolution and the
//! subcommand implementations behind the `estate` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;

use anyhow::Result;
use estate_core::{CatalogError, ErrorResponse};

use crate::cli::{Cli, Commands};
use crate::config::{ConfigOverrides, EstateConfig};

/// Load configuration for a parsed command line
pub fn load_config(cli: &Cli) -> Result<EstateConfig> {
    EstateConfig::load(
        cli.config.clone(),
        ConfigOverrides {
            db_path: cli.db_path.clone(),
            namespace: cli.namespace.clone(),
            database: cli.database.clone(),
        },
    )
}

/// Run one subcommand against `config`
pub async fn run(config: &EstateConfig, cli: Cli) -> Result<()> {
    let format = cli.format;
    match cli.command {
        Commands::Config(cmd) => commands::config::execute(config, cmd).await,
        Commands::Owners(cmd) => {
            let service = commands::open_service(config).await?;
            commands::owners::execute(&service, format, cmd).await
        }
        Commands::Properties(cmd) => {
            let service = commands::open_service(config).await?;
            commands::properties::execute(&service, format, cmd).await
        }
        Commands::Images(cmd) => {
            let service = commands::open_service(config).await?;
            commands::images::execute(&service, format, cmd).await
        }
        Commands::Traces(cmd) => {
            let service = commands::open_service(config).await?;
            commands::traces::execute(&service, format, cmd).await
        }
    }
}

/// Boundary rendering of a failure, if it came from the catalog
pub fn error_response(err: &anyhow::Error) -> Option<ErrorResponse> {
    err.downcast_ref::<CatalogError>().map(ErrorResponse::from)
}

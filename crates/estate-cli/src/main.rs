use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use estate_cli::{cli::Cli, error_response, load_config, logging, run};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration with CLI overrides
    let config = load_config(&cli)?;

    // Initialize logging on stderr so stdout stays parseable
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = logging::resolve_filter(
        cli.log_level,
        cli.verbose,
        config.log_level()?,
        rust_log.as_deref(),
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
    debug!(?config, "configuration loaded");

    if let Err(err) = run(&config, cli).await {
        match error_response(&err) {
            Some(response) => {
                eprintln!("{}", serde_json::to_string_pretty(&response)?);
                std::process::exit(1);
            }
            None => {
                eprintln!("{} {:#}", "Error:".red().bold(), err);
                std::process::exit(2);
            }
        }
    }

    Ok(())
}

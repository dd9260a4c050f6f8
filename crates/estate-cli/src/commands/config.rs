use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::cli::ConfigCommands;
use crate::config::EstateConfig;

/// Execute config subcommand
pub async fn execute(config: &EstateConfig, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { format } => show(config, &format),
        ConfigCommands::Init { path, force } => init(path, force),
    }
}

/// Show the current effective configuration
fn show(config: &EstateConfig, format: &str) -> Result<()> {
    let rendered = match format {
        "json" => config.display_as_json()?,
        _ => config.display_as_toml()?,
    };
    println!("{}", rendered);
    Ok(())
}

/// Initialize a new config file
fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = path
        .or_else(|| EstateConfig::default_config_path().ok())
        .context("Could not determine config file path")?;

    if config_path.exists() && !force {
        println!(
            "{} Config file already exists at: {}",
            "Error:".red().bold(),
            config_path.display()
        );
        println!("Use {} to overwrite", "--force".yellow());
        return Ok(());
    }

    EstateConfig::create_example(&config_path)?;
    println!(
        "{} Created config file at: {}",
        "Success:".green().bold(),
        config_path.display()
    );
    Ok(())
}

use anyhow::{Context, Result};
use clap::ValueEnum;
use estate_core::RepositoryOptions;
use estate_surrealdb::SurrealDbConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::LogLevel;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EstateConfig {
    /// Storage backend
    #[serde(default)]
    pub database: SurrealDbConfig,
    /// Repository tuning
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Properties whose relations are fetched at the same time when listing
    #[serde(default = "default_join_concurrency")]
    pub join_concurrency: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            join_concurrency: default_join_concurrency(),
        }
    }
}

fn default_join_concurrency() -> usize {
    RepositoryOptions::default().join_concurrency
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// off, error, warn, info, debug or trace
    pub level: Option<String>,
}

/// Values given on the command line, applied after the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<String>,
    pub namespace: Option<String>,
    pub database: Option<String>,
}

impl EstateConfig {
    /// Load configuration with precedence: defaults < file < env < args
    pub fn load(config_file: Option<PathBuf>, overrides: ConfigOverrides) -> Result<Self> {
        Self::load_with_env(config_file, overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`EstateConfig::load`] with environment lookups going through `env`
    pub fn load_with_env<F>(
        config_file: Option<PathBuf>,
        overrides: ConfigOverrides,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::from_file_or_default(config_file)?;

        if let Some(path) = env("ESTATE_DB_PATH") {
            config.database.path = path;
        }
        if let Some(namespace) = env("ESTATE_NAMESPACE") {
            config.database.namespace = namespace;
        }
        if let Some(database) = env("ESTATE_DATABASE") {
            config.database.database = database;
        }
        if let Some(level) = env("ESTATE_LOG_LEVEL") {
            config.logging.level = Some(level);
        }
        if let Some(concurrency) = env("ESTATE_JOIN_CONCURRENCY") {
            config.catalog.join_concurrency = concurrency
                .trim()
                .parse()
                .with_context(|| format!("Invalid ESTATE_JOIN_CONCURRENCY: {}", concurrency))?;
        }

        if let Some(path) = overrides.db_path {
            config.database.path = path;
        }
        if let Some(namespace) = overrides.namespace {
            config.database.namespace = namespace;
        }
        if let Some(database) = overrides.database {
            config.database.database = database;
        }

        Ok(config)
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("estate");
        Ok(config_dir.join("config.toml"))
    }

    pub fn repository_options(&self) -> RepositoryOptions {
        RepositoryOptions::default().with_join_concurrency(self.catalog.join_concurrency)
    }

    /// Log level from the config file or `ESTATE_LOG_LEVEL`
    pub fn log_level(&self) -> Result<Option<LogLevel>> {
        self.logging
            .level
            .as_deref()
            .map(|level| {
                LogLevel::from_str(level.trim(), true)
                    .map_err(|_| anyhow::anyhow!("Unknown log level: {}", level))
            })
            .transpose()
    }

    /// Write the default configuration to `path`
    pub fn create_example(path: &Path) -> Result<()> {
        let body = Self::default().display_as_toml()?;
        let example = format!(
            "# Estate CLI configuration\n# Location: ~/.config/estate/config.toml\n# database.path = \":memory:\" keeps everything in process memory\n\n{}",
            body
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(path, example).context("Failed to write config file")?;
        Ok(())
    }

    /// Load config from file or return default
    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        let path = config_file
            .or_else(|| Self::default_config_path().ok())
            .filter(|p| p.exists());

        if let Some(path) = path {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Display the current configuration as TOML
    pub fn display_as_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config as TOML")
    }

    /// Display the current configuration as JSON
    pub fn display_as_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config as JSON")
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use estate_core::EntityId;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages (default for verbose)
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// How results are printed on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "estate")]
#[command(about = "estate - manage the real-estate listing catalog")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses ESTATE_LOG_LEVEL, the config file or RUST_LOG
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/estate/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Database directory, or :memory: (overrides config file)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// SurrealDB namespace (overrides config file)
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// SurrealDB database (overrides config file)
    #[arg(long, global = true)]
    pub database: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Property owners
    #[command(subcommand)]
    Owners(OwnerCommands),

    /// Property listings
    #[command(subcommand)]
    Properties(PropertyCommands),

    /// Images attached to a property
    #[command(subcommand)]
    Images(ImageCommands),

    /// Sale and valuation history of a property
    #[command(subcommand)]
    Traces(TraceCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum OwnerCommands {
    /// List every owner
    List,

    /// Show one owner
    Get { id: EntityId },

    /// Register a new owner
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        /// Photo URL or path
        #[arg(long, default_value = "")]
        photo: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        birthday: NaiveDate,
    },

    /// Replace an owner's details
    Update {
        id: EntityId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "")]
        photo: String,
        #[arg(long)]
        birthday: NaiveDate,
    },

    /// Remove an owner (their properties are left in place)
    Delete { id: EntityId },
}

#[derive(Subcommand, Debug)]
pub enum PropertyCommands {
    /// List every property with owner, images and traces
    List,

    /// Show one property with owner, images and traces
    Get { id: EntityId },

    /// Search by name text, address substring and price range
    Search {
        /// Words matched against the text index
        #[arg(long)]
        name: Option<String>,
        /// Case-insensitive address substring
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
    },

    /// Properties of one owner, without related records
    ByOwner { owner_id: EntityId },

    /// List a new property for an existing owner
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        price: f64,
        /// Internal reference code
        #[arg(long = "code")]
        code_internal: String,
        #[arg(long)]
        year: i32,
        #[arg(long = "owner")]
        owner_id: EntityId,
    },

    /// Replace a property's details
    Update {
        id: EntityId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        price: f64,
        #[arg(long = "code")]
        code_internal: String,
        #[arg(long)]
        year: i32,
        #[arg(long = "owner")]
        owner_id: EntityId,
    },

    /// Remove a property together with its images and traces
    Delete { id: EntityId },
}

#[derive(Subcommand, Debug)]
pub enum ImageCommands {
    /// Images of one property
    List { property_id: EntityId },

    /// Show one image
    Get { id: EntityId },

    /// Attach an image to a property
    Add {
        property_id: EntityId,
        #[arg(long)]
        file: String,
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        enabled: bool,
    },

    /// Replace an image's details
    Update {
        id: EntityId,
        #[arg(long = "property")]
        property_id: EntityId,
        #[arg(long)]
        file: String,
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        enabled: bool,
    },

    /// Remove an image
    Delete { id: EntityId },
}

#[derive(Subcommand, Debug)]
pub enum TraceCommands {
    /// Traces of one property
    List { property_id: EntityId },

    /// Show one trace
    Get { id: EntityId },

    /// Record a sale or valuation
    Add {
        property_id: EntityId,
        /// Sale timestamp (RFC 3339)
        #[arg(long)]
        date_sale: DateTime<Utc>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        value: f64,
        #[arg(long, default_value_t = 0.0)]
        tax: f64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output format (toml, json)
        #[arg(short = 'F', long, default_value = "toml")]
        format: String,
    },

    /// Write a config file with default values
    Init {
        /// Target path (defaults to ~/.config/estate/config.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

//! Log filter resolution for the binary

use crate::cli::LogLevel;

/// Crates whose events are shown at the chosen level
const CRATES: [&str; 3] = ["estate_cli", "estate_core", "estate_surrealdb"];

/// Level used when nothing is configured
pub const DEFAULT_LEVEL: LogLevel = LogLevel::Warn;

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Off => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Directive for `EnvFilter` scoping `level` to the catalog crates
pub fn directive(level: LogLevel) -> String {
    let level = level_name(level);
    CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Pick the filter: `--log-level`, then `--verbose`, then config/env, then
/// `RUST_LOG` verbatim, then the default
pub fn resolve_filter(
    explicit: Option<LogLevel>,
    verbose: bool,
    configured: Option<LogLevel>,
    rust_log: Option<&str>,
) -> String {
    if let Some(level) = explicit {
        return directive(level);
    }
    if verbose {
        return directive(LogLevel::Debug);
    }
    if let Some(level) = configured {
        return directive(level);
    }
    match rust_log {
        Some(filter) if !filter.trim().is_empty() => filter.to_string(),
        _ => directive(DEFAULT_LEVEL),
    }
}

use std::path::Path;

use serde::Deserialize;
use ta_common::error::{TaError, TaResult};

pub const DEFAULT_LOG_LEVEL: &str = "INFO";

#[derive(Debug, Default, Deserialize)]
struct SettingsConf {
    logging: Option<LoggingStanza>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingStanza {
    loglevel: Option<String>,
}

/// Read `[logging] loglevel` from the add-on settings conf.
pub fn read_log_level(path: &Path) -> TaResult<String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| TaError::Config(format!("cannot read {}: {e}", path.display())))?;
    let conf: SettingsConf = toml::from_str(&raw)
        .map_err(|e| TaError::Config(format!("invalid settings conf {}: {e}", path.display())))?;

    Ok(conf
        .logging
        .and_then(|l| l.loglevel)
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()))
}

/// Resolve the configured log level, taking `INFO` when the settings cannot
/// be read. The error is handed back so it can be logged once tracing is up.
pub fn resolve_log_level(path: &Path) -> (String, Option<TaError>) {
    match read_log_level(path) {
        Ok(level) => (level, None),
        Err(e) => (DEFAULT_LOG_LEVEL.to_owned(), Some(e)),
    }
}

/// Map a Splunk log level name onto a `tracing` filter directive.
pub fn to_filter_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARN" | "WARNING" => "warn",
        "ERROR" | "CRITICAL" | "FATAL" => "error",
        "TRACE" => "trace",
        _ => "info",
    }
}

//! Logging setup for hosts embedding the node
//!
//! Command output goes to stdout, so every mode writes to stderr. Hosts that
//! install their own subscriber skip this module.

use std::io;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// How much to log and in which shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggingMode {
    /// No subscriber at all
    #[default]
    Silent,
    /// Compact lines, `info` and up
    Development,
    /// Pretty multi-line records with source locations, `debug` and up
    Debug,
    /// One JSON object per record, for log collectors
    Json,
}

impl LoggingMode {
    /// Parse a `SONOS_LOG_MODE` value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "silent" => Some(LoggingMode::Silent),
            "development" => Some(LoggingMode::Development),
            "debug" => Some(LoggingMode::Debug),
            "json" => Some(LoggingMode::Json),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid environment variable: {0}")]
    InvalidEnv(String),
}

/// Install the global subscriber for `mode`.
///
/// # Environment Variables
///
/// - `SONOS_LOG_LEVEL`: filter directive, wins over `RUST_LOG`
/// - `RUST_LOG`: filter directive used when `SONOS_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let init = match mode {
        LoggingMode::Silent => return Ok(()),
        LoggingMode::Development => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .with(create_env_filter("info")?)
            .try_init(),
        LoggingMode::Debug => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .pretty()
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(create_env_filter("debug")?)
            .try_init(),
        LoggingMode::Json => Registry::default()
            .with(fmt::layer().with_writer(io::stderr).json())
            .with(create_env_filter("info")?)
            .try_init(),
    };
    init.map_err(|e| LoggingError::TracingInit(e.to_string()))
}

/// Install the subscriber named by `SONOS_LOG_MODE`, silent when unset.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var("SONOS_LOG_MODE") {
        Ok(name) => LoggingMode::from_name(&name)
            .ok_or_else(|| LoggingError::InvalidEnv(format!("SONOS_LOG_MODE={}", name)))?,
        Err(_) => LoggingMode::Silent,
    };
    init_logging(mode)
}

fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let directive = std::env::var("SONOS_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level.to_string());

    EnvFilter::try_new(&directive)
        .map_err(|e| LoggingError::InvalidEnv(format!("log filter {}: {}", directive, e)))
}

//! Logging infrastructure for the relay.
//!
//! This module provides tracing-based logging with support for:
//! - Multiple output targets (stderr, file)
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Selectable format (text or JSON)

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::env_var_name;
use crate::error::ConfigError;
use crate::models::Args;

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a log level from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Convert to a filter string for tracing-subscriber.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

impl LogFormat {
    /// Parse a log format from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogConfig {
    pub level: LogLevel,
    /// Output file path (None means stderr).
    pub file: Option<PathBuf>,
    pub format: LogFormat,
}

impl LogConfig {
    /// Builds the logging configuration from CLI flags, falling back to
    /// `DEVOPS_RELAY_LOG_*` environment variables.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        Self::from_args_with(args, |name| std::env::var(name).ok())
    }

    /// Same as [`LogConfig::from_args`] with an explicit environment lookup.
    ///
    /// Precedence: CLI args > environment variables > defaults.
    pub fn from_args_with<F>(args: &Args, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |field: &str| lookup(&env_var_name(field)).filter(|v| !v.is_empty());

        let level = match args.log_level.clone().or_else(|| env("log_level")) {
            Some(s) => LogLevel::parse(&s).ok_or_else(|| ConfigError::InvalidValue {
                field: "log_level".to_string(),
                message: format!("'{}' is not one of trace, debug, info, warn, error", s),
            })?,
            None => LogLevel::default(),
        };

        let format = match args.log_format.clone().or_else(|| env("log_format")) {
            Some(s) => LogFormat::parse(&s).ok_or_else(|| ConfigError::InvalidValue {
                field: "log_format".to_string(),
                message: format!("'{}' is not one of text, json", s),
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            level,
            file: args
                .log_file
                .clone()
                .or_else(|| env("log_file").map(PathBuf::from)),
            format,
        })
    }
}

/// Guard that must be held to ensure logs are flushed.
///
/// When this guard is dropped, all pending log messages are flushed.
/// Hold this until application exit.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Builds the filter: `RUST_LOG` when given, otherwise the configured level
/// for this crate and the HTTP trace layer only.
pub fn build_filter(level: LogLevel, rust_log: Option<&str>) -> Result<EnvFilter> {
    match rust_log.filter(|s| !s.trim().is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid RUST_LOG directives: {}", directives)),
        None => {
            let level = level.as_filter_str();
            EnvFilter::try_new(format!("devops_relay={level},tower_http={level}"))
                .context("Failed to build log filter")
        }
    }
}

/// Initialize the logging system.
///
/// The guard must be held until application exit to ensure logs are flushed.
///
/// # Example
///
/// ```rust,no_run
/// use devops_relay::logging::{LogConfig, LogLevel, LogFormat, init_logging};
/// use std::path::PathBuf;
///
/// let config = LogConfig {
///     level: LogLevel::Debug,
///     file: Some(PathBuf::from("/tmp/devops-relay.log")),
///     format: LogFormat::Text,
/// };
///
/// let _guard = init_logging(&config).unwrap();
/// // Logging is now active, _guard keeps it alive
/// ```
#[must_use = "the returned guard must be held until application exit"]
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(config.level, rust_log.as_deref())?;

    let (writer, guard) = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };
    let to_file = config.file.is_some();

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .with_writer(writer)
                .json()
                .with_current_span(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_file(to_file)
                .with_line_number(to_file);

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .context("Failed to install log subscriber")?;
        }
        LogFormat::Text => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(!to_file)
                .with_target(true)
                .with_level(true)
                .with_file(to_file)
                .with_line_number(to_file);

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .context("Failed to install log subscriber")?;
        }
    }

    Ok(LogGuard { _guard: guard })
}

//! Logging system configuration and initialization
//!
//! - Console output, plain or structured JSON
//! - Optional daily-rolling file output
//! - `RUST_LOG` overrides the configured filter
//! - Timestamps in China Standard Time (UTC+8), the catalog's own timezone

use anyhow::{Result, anyhow};
use chrono::{FixedOffset, Utc};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;
use crate::infrastructure::config::qidian;

/// Keeps non-blocking file writers alive for the life of the process
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

const LOG_FILE_PREFIX: &str = "qidian-catalog.log";

/// Dependencies that are only interesting at TRACE
const QUIET_TARGETS: &[(&str, &str)] = &[
    ("reqwest", "info"),
    ("hyper", "warn"),
    ("h2", "warn"),
    ("html5ever", "warn"),
    ("selectors", "warn"),
];

/// China Standard Time timestamps
struct CstTimeFormatter;

impl FormatTime for CstTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let offset = FixedOffset::east_opt(qidian::UTC_OFFSET_SECONDS).ok_or(std::fmt::Error)?;
        let now = Utc::now().with_timezone(&offset);
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Get the log directory relative to the executable location
pub fn get_log_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(std::path::Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(LoggingConfig::default())
}

/// Build the filter for a config; `RUST_LOG` wins when set
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    if !config.level.to_lowercase().contains("trace") {
        for (target, level) in QUIET_TARGETS {
            filter = filter.add_directive(format!("{target}={level}").parse()?);
        }
    }

    for (module, level) in &config.module_filters {
        filter = filter.add_directive(
            format!("{module}={level}")
                .parse()
                .map_err(|e| anyhow!("Invalid filter for module '{}': {}", module, e))?,
        );
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// Fails if a global subscriber has already been installed.
pub fn init_logging_with_config(config: LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(&config)?;

    let console_layer = config.console_output.then(|| {
        if config.json_format {
            fmt::layer().json().with_timer(CstTimeFormatter).boxed()
        } else {
            fmt::layer().with_timer(CstTimeFormatter).with_target(true).boxed()
        }
    });

    let file_layer = if config.file_output {
        let log_dir = config.log_dir.clone().unwrap_or_else(get_log_directory);
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

        let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard registry poisoned"))?
            .push(guard);

        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_timer(CstTimeFormatter);
        Some(if config.json_format {
            layer.json().boxed()
        } else {
            layer.boxed()
        })
    } else {
        None
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!(
        "Logging initialized (level={}, json={}, file={})",
        config.level,
        config.json_format,
        config.file_output
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_module_overrides() {
        let mut config = LoggingConfig::default();
        config
            .module_filters
            .insert("qidian_catalog".to_string(), "debug".to_string());
        assert!(build_env_filter(&config).is_ok());
    }

    #[test]
    fn test_log_directory_is_named_logs() {
        assert!(get_log_directory().ends_with("logs"));
    }
}

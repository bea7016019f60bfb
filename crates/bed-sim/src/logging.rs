//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The level comes from `--log-level`, then the `BED_LOG` environment
//! variable, then defaults to `info`. Events go to stderr so JSON printed on
//! stdout stays machine readable.

use tracing::Level;
use tracing_subscriber::fmt;

use crate::LogLevel;

/// Installs the global subscriber. Call once, at startup.
pub fn init_logging(cli_level: Option<LogLevel>) {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("BED_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

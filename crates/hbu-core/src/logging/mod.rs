//! Structured logging for the hbu binary and server.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for servers and scripted runs
//!
//! # Usage
//!
//! ```ignore
//! use hbu_core::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env(None, None);
//! let run_id = init_logging(&config);
//! let _run = tracing::info_span!("run", run_id = %run_id).entered();
//! tracing::info!(plot_id = "plot-001", "generating study");
//! ```
//!
//! # Design Notes
//!
//! - stdout is reserved for command payloads (JSON, tables, reports)
//! - stderr receives all log output (human or JSONL)
//! - Every invocation gets a `run_id` for correlating events

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging subsystem and return the run id.
///
/// `RUST_LOG` overrides the configured level when set. Calling this more
/// than once keeps the first subscriber.
pub fn init_logging(config: &LogConfig) -> String {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let installed = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };

    let run_id = generate_run_id();
    match installed {
        Ok(()) => tracing::debug!(%run_id, format = %config.format, level = %config.level, "logging initialized"),
        Err(_) => tracing::debug!(%run_id, "logging already initialized"),
    }
    run_id
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    // First 12 hex chars are enough to correlate one run
    format!("run-{}", &uuid[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_shape() {
        let id = generate_run_id();
        assert!(id.starts_with("run-"));
        assert_eq!(id.len(), 16);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_run_id());
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        let config = LogConfig::default().with_level(LogLevel::Off);
        let a = init_logging(&config);
        let b = init_logging(&config);
        assert_ne!(a, b);
    }
}

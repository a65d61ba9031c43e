// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Logging configuration with structured output.

use std::env;
use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub enum LogFormat {
    /// JSON format for machine consumption.
    Json,
    /// Pretty format for interactive use.
    Pretty,
    /// Compact format for space-constrained environments.
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG` and `LOG_FORMAT` from the environment.
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };
        Self { level, format }
    }

    /// Initialize the global tracing subscriber. Diagnostics go to
    /// stderr; stdout is reserved for command output.
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);

        match self.format {
            LogFormat::Json => {
                registry
                    .with(fmt::layer().with_writer(io::stderr).with_target(true).json())
                    .init();
            }
            LogFormat::Pretty => {
                registry
                    .with(fmt::layer().with_writer(io::stderr).with_target(true))
                    .init();
            }
            LogFormat::Compact => {
                registry
                    .with(fmt::layer().with_writer(io::stderr).with_target(false).compact())
                    .init();
            }
        }

        info!(
            service.version = env!("CARGO_PKG_VERSION"),
            log.level = %self.level,
            log.format = ?self.format,
            "logging initialized"
        );

        Ok(())
    }
}

/// Initialize logging with default configuration.
pub fn init_default() -> Result<()> {
    LoggingConfig::default().init()
}

/// Initialize logging from environment.
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(matches!(config.format, LogFormat::Pretty));
    }

    #[test]
    fn from_env_falls_back_to_pretty_on_unknown_format() {
        std::env::set_var("LOG_FORMAT", "yaml");
        let config = LoggingConfig::from_env();
        assert!(matches!(config.format, LogFormat::Pretty));
        std::env::remove_var("LOG_FORMAT");
    }
}

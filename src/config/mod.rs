//! Configuration module for ctxlog.
//!
//! Everything is read from environment variables:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `TL_LOG` | level name (trace, debug, info, error, fatal) | info |
//! | `TL_LOG_JSON` | `true` selects JSON output | console |
//! | `TL_LOG_LONG_QUERY_MS` | access-log long-query threshold | 1000 |
//!
//! # Example
//!
//! ```rust,ignore
//! use ctxlog::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Level: {}", config.logging.level);
//! ```

mod access_log;
mod error;
mod logging;
mod parse;

pub use access_log::{AccessLogConfig, DEFAULT_LONG_QUERY_MS, LONG_QUERY_ENV};
pub use error::ConfigError;
pub use logging::{LoggingConfig, JSON_ENV, LEVEL_ENV};
pub use parse::{env_opt, env_or};

/// Complete application configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Logger configuration.
    pub logging: LoggingConfig,
    /// Access log middleware configuration.
    pub access_log: AccessLogConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            logging: LoggingConfig::from_env(),
            access_log: AccessLogConfig::from_env()?,
        })
    }

    /// Print configuration summary through the global logger.
    pub fn log_summary(&self) {
        crate::logging::debug()
            .str("level", self.logging.level.as_str())
            .bool("json", self.logging.json)
            .uint("long_query_ms", self.access_log.long_query_ms)
            .msg("configuration loaded");
    }
}

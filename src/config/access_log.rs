//! Access log configuration.

use super::parse::env_parse;
use super::ConfigError;

/// Default long-query threshold variable.
pub const LONG_QUERY_ENV: &str = "TL_LOG_LONG_QUERY_MS";

/// Threshold used when `TL_LOG_LONG_QUERY_MS` is not set.
pub const DEFAULT_LONG_QUERY_MS: u64 = 1000;

/// Access log configuration loaded from environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessLogConfig {
    /// Requests slower than this (milliseconds) are flagged as long queries.
    pub long_query_ms: u64,
}

impl AccessLogConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            long_query_ms: env_parse(LONG_QUERY_ENV, DEFAULT_LONG_QUERY_MS)?,
        })
    }
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            long_query_ms: DEFAULT_LONG_QUERY_MS,
        }
    }
}

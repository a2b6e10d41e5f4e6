//! Logging configuration.

use super::parse::{env_flag, env_or};
use crate::level::Severity;

/// Level name variable.
pub const LEVEL_ENV: &str = "TL_LOG";

/// Structured (JSON) output switch; only the exact value `true` enables it.
pub const JSON_ENV: &str = "TL_LOG_JSON";

/// Logging configuration loaded from environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum severity that is emitted.
    pub level: Severity,
    /// Emit one JSON object per line instead of console text.
    pub json: bool,
}

impl LoggingConfig {
    /// Load configuration from environment variables.
    ///
    /// Never fails: an unknown level name resolves to INFO and any
    /// `TL_LOG_JSON` value other than `true` selects console output.
    pub fn from_env() -> Self {
        Self {
            level: Severity::from_name(&env_or(LEVEL_ENV, "")),
            json: env_flag(JSON_ENV),
        }
    }

    /// Same configuration with a different level.
    pub fn with_level(self, level: Severity) -> Self {
        Self { level, ..self }
    }
}

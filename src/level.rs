//! Log severity levels.

use std::fmt;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

/// Severity of a log event.
///
/// Ordered from least to most severe; a logger configured at a given level
/// suppresses every event below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    #[default]
    Info,
    Error,
    Fatal,
}

impl Severity {
    /// All levels, least severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Resolve a level by name, case-insensitively.
    ///
    /// Unknown or empty names resolve to [`Severity::Info`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Severity::Trace,
            "DEBUG" => Severity::Debug,
            "INFO" => Severity::Info,
            "ERROR" => Severity::Error,
            "FATAL" => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    /// Lowercase name, as written in JSON output.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// Bracketed, padded uppercase tag used by console output: `[INFO ]`.
    pub fn console_tag(&self) -> String {
        format!("[{:<5}]", self.as_str()).to_uppercase()
    }

    /// Closest `tracing` level. `tracing` has no fatal level, so fatal maps to ERROR.
    #[inline]
    pub const fn as_tracing(&self) -> tracing::Level {
        match self {
            Severity::Trace => tracing::Level::TRACE,
            Severity::Debug => tracing::Level::DEBUG,
            Severity::Info => tracing::Level::INFO,
            Severity::Error | Severity::Fatal => tracing::Level::ERROR,
        }
    }

    /// Map a `tracing` level back to a severity (WARN has no counterpart and folds into ERROR).
    pub fn from_tracing(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            _ => Severity::Error,
        }
    }

    #[inline]
    pub fn as_level_filter(&self) -> LevelFilter {
        LevelFilter::from_level(self.as_tracing())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Severity::from_name(s))
    }
}

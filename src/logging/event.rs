//! Structured event builder.

use std::fmt::{self, Write as _};

use super::format::{push_json_str, push_key};
use super::Logger;
use crate::level::Severity;

/// A log event under construction.
///
/// Built from a [`Logger`] at a given severity, enriched with typed fields and
/// emitted with [`Event::msg`]. An event below the logger's level is inert:
/// every method is a no-op and nothing is written.
///
/// ```rust,ignore
/// ctxlog::info()
///     .str("key", "value")
///     .int("count", 42)
///     .msg("Structured logging example");
/// ```
#[must_use = "an event is only written by msg, msgf or send"]
pub struct Event {
    inner: Option<Pending>,
}

struct Pending {
    logger: Logger,
    severity: Severity,
    fields: String,
}

impl Event {
    pub(crate) fn new(logger: &Logger, severity: Severity) -> Self {
        let inner = logger.enabled(severity).then(|| Pending {
            logger: logger.clone(),
            severity,
            fields: String::new(),
        });
        Self { inner }
    }

    /// Whether this event will be written.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Severity of the event, `None` when the event is filtered out.
    pub fn severity(&self) -> Option<Severity> {
        self.inner.as_ref().map(|p| p.severity)
    }

    #[inline]
    fn member(mut self, key: &str, encode: impl FnOnce(&mut String)) -> Self {
        if let Some(pending) = self.inner.as_mut() {
            push_key(&mut pending.fields, key);
            encode(&mut pending.fields);
        }
        self
    }

    /// Add a string field.
    pub fn str(self, key: &str, value: &str) -> Self {
        self.member(key, |buf| push_json_str(buf, value))
    }

    /// Add a signed integer field.
    pub fn int(self, key: &str, value: i64) -> Self {
        self.member(key, |buf| {
            let _ = write!(buf, "{}", value);
        })
    }

    /// Add an unsigned integer field.
    pub fn uint(self, key: &str, value: u64) -> Self {
        self.member(key, |buf| {
            let _ = write!(buf, "{}", value);
        })
    }

    /// Add a boolean field.
    pub fn bool(self, key: &str, value: bool) -> Self {
        self.member(key, |buf| buf.push_str(if value { "true" } else { "false" }))
    }

    /// Embed already-encoded JSON verbatim.
    ///
    /// The bytes are not validated; the caller guarantees they are one JSON value.
    pub fn raw_json(self, key: &str, value: &[u8]) -> Self {
        self.member(key, |buf| buf.push_str(&String::from_utf8_lossy(value)))
    }

    /// Add the error's message under the `error` key.
    pub fn err(self, err: &(dyn std::error::Error + '_)) -> Self {
        self.member("error", |buf| push_json_str(buf, &err.to_string()))
    }

    /// Add any displayable value as a string field.
    pub fn display(self, key: &str, value: impl fmt::Display) -> Self {
        self.member(key, |buf| push_json_str(buf, &value.to_string()))
    }

    /// Write the event with a message.
    pub fn msg(self, message: &str) {
        if let Some(pending) = self.inner {
            pending
                .logger
                .emit(pending.severity, &pending.fields, message);
        }
    }

    /// Write the event with a formatted message.
    ///
    /// Formatting only happens when the event is enabled.
    pub fn msgf(self, args: fmt::Arguments<'_>) {
        if self.enabled() {
            let message = args.to_string();
            self.msg(&message);
        }
    }

    /// Write the event without a message.
    pub fn send(self) {
        self.msg("");
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(p) => f
                .debug_struct("Event")
                .field("severity", &p.severity)
                .field("fields", &p.fields)
                .finish(),
            None => f.write_str("Event(disabled)"),
        }
    }
}

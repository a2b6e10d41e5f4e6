//! Logger instances.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

use super::event::Event;
use super::format::{push_json_str, push_key, ConsoleFormat, JsonFormat};
use crate::config::LoggingConfig;
use crate::level::Severity;

/// `tracing` target of every event emitted through a [`Logger`].
pub const TARGET: &str = "ctxlog";

/// A structured logger: level, output sink and a set of fields attached to
/// every event.
///
/// Cloning is cheap and clones share everything. A logger is never changed in
/// place; [`Logger::with`] derives a new one with extra fields and
/// reconfiguration builds a fresh instance, so existing clones keep logging
/// with the configuration they were created with.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    level: Severity,
    json: bool,
    dispatch: Dispatch,
    /// Pre-encoded JSON members, each starting with a comma.
    fields: String,
}

impl Logger {
    /// Logger writing console text to stdout, or JSON lines to stderr.
    pub fn new(config: LoggingConfig) -> Self {
        if config.json {
            Self::with_writer(config, io::stderr)
        } else {
            Self::with_writer(config, io::stdout)
        }
    }

    /// Logger writing to a custom sink.
    pub fn with_writer<W>(config: LoggingConfig, writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        // Events are already filtered by `Event::new`; the subscriber filter
        // only matters for plain `tracing` macros run under this dispatch.
        let builder = tracing_subscriber::fmt()
            .with_max_level(config.level.as_level_filter())
            .with_writer(writer);
        let dispatch = if config.json {
            Dispatch::new(builder.event_format(JsonFormat).finish())
        } else {
            Dispatch::new(builder.event_format(ConsoleFormat).finish())
        };

        Self {
            inner: Arc::new(Inner {
                level: config.level,
                json: config.json,
                dispatch,
                fields: String::new(),
            }),
        }
    }

    /// Minimum severity this logger writes.
    #[inline]
    pub fn level(&self) -> Severity {
        self.inner.level
    }

    /// Whether output is JSON.
    #[inline]
    pub fn is_json(&self) -> bool {
        self.inner.json
    }

    /// Whether an event at `severity` would be written.
    #[inline]
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.inner.level
    }

    /// Start deriving a child logger with additional fields.
    pub fn with(&self) -> WithFields {
        WithFields {
            parent: self.clone(),
            fields: self.inner.fields.clone(),
        }
    }

    /// Start an event at the given severity.
    #[inline]
    pub fn event(&self, severity: Severity) -> Event {
        Event::new(self, severity)
    }

    pub fn trace(&self) -> Event {
        self.event(Severity::Trace)
    }

    pub fn debug(&self) -> Event {
        self.event(Severity::Debug)
    }

    pub fn info(&self) -> Event {
        self.event(Severity::Info)
    }

    pub fn error(&self) -> Event {
        self.event(Severity::Error)
    }

    /// Event at FATAL severity. Writing it does not stop the process.
    pub fn fatal(&self) -> Event {
        self.event(Severity::Fatal)
    }

    /// Write a formatted message at `severity`.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.event(severity).msgf(args);
    }

    pub(crate) fn emit(&self, severity: Severity, event_fields: &str, message: &str) {
        let mut fields = String::with_capacity(self.inner.fields.len() + event_fields.len());
        fields.push_str(&self.inner.fields);
        fields.push_str(event_fields);
        let fields = fields.as_str();
        let severity_name = severity.as_str();

        macro_rules! dispatch_event {
            ($level:expr) => {
                tracing::event!(
                    target: TARGET,
                    $level,
                    severity = severity_name,
                    fields = fields,
                    message = message
                )
            };
        }

        // tracing needs a constant level at each callsite
        tracing::dispatcher::with_default(&self.inner.dispatch, || match severity {
            Severity::Trace => dispatch_event!(tracing::Level::TRACE),
            Severity::Debug => dispatch_event!(tracing::Level::DEBUG),
            Severity::Info => dispatch_event!(tracing::Level::INFO),
            Severity::Error | Severity::Fatal => dispatch_event!(tracing::Level::ERROR),
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.inner.level)
            .field("json", &self.inner.json)
            .field("fields", &self.inner.fields)
            .finish()
    }
}

/// Builder for a child logger; see [`Logger::with`].
#[must_use = "call .logger() to obtain the derived logger"]
pub struct WithFields {
    parent: Logger,
    fields: String,
}

impl WithFields {
    pub fn str(mut self, key: &str, value: &str) -> Self {
        push_key(&mut self.fields, key);
        push_json_str(&mut self.fields, value);
        self
    }

    pub fn int(mut self, key: &str, value: i64) -> Self {
        push_key(&mut self.fields, key);
        self.fields.push_str(&value.to_string());
        self
    }

    pub fn bool(mut self, key: &str, value: bool) -> Self {
        push_key(&mut self.fields, key);
        self.fields.push_str(if value { "true" } else { "false" });
        self
    }

    /// Finish: a new logger sharing the parent's level and sink.
    pub fn logger(self) -> Logger {
        let parent = &self.parent.inner;
        Logger {
            inner: Arc::new(Inner {
                level: parent.level,
                json: parent.json,
                dispatch: parent.dispatch.clone(),
                fields: self.fields,
            }),
        }
    }
}

/// In-memory sink, mostly for tests.
///
/// Every clone appends to the same buffer.
#[derive(Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        match self.buffer.lock() {
            Ok(buffer) => String::from_utf8_lossy(&buffer).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    /// Non-empty output lines.
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Output lines parsed as JSON; lines that are not JSON are skipped.
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect()
    }
}

impl io::Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("memory writer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

//! Process-wide structured logging.
//!
//! A single global [`Logger`] is built from the environment (`TL_LOG`,
//! `TL_LOG_JSON`) the first time it is used. [`set_level`] and [`set_logger`]
//! replace it atomically; loggers fetched earlier keep their old settings, so
//! re-fetch with [`logger`] after reconfiguring.
//!
//! ```rust,ignore
//! ctxlog::plain!("This is a plain print (no level, no timestamp)");
//! ctxlog::infof!("This is an info message: {}", 3);
//! ctxlog::info().str("key", "value").int("count", 42).msg("Structured logging example");
//! ```

mod event;
mod format;
mod logger;
mod timestamp;

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use tracing_subscriber::fmt::MakeWriter;

pub use event::Event;
pub use format::{ConsoleFormat, JsonFormat};
pub use logger::{Logger, MemoryWriter, WithFields, TARGET};
pub use timestamp::Rfc3339;

use crate::config::LoggingConfig;
use crate::level::Severity;

static GLOBAL: LazyLock<ArcSwap<Logger>> =
    LazyLock::new(|| ArcSwap::from_pointee(Logger::new(LoggingConfig::from_env())));

/// (Re)build the global logger from the environment and return it.
pub fn init() -> Logger {
    let logger = Logger::new(LoggingConfig::from_env());
    set_logger(logger.clone());
    logger
}

/// Rebuild the global logger from the environment with `level`.
///
/// The change is announced at TRACE through the new logger, so the
/// announcement is only visible when `level` is TRACE.
pub fn set_level(level: Severity) {
    install_level(Logger::new(LoggingConfig::from_env().with_level(level)));
}

/// Like [`set_level`], writing to `writer` instead of stdout/stderr.
pub fn set_level_with_writer<W>(level: Severity, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    install_level(Logger::with_writer(
        LoggingConfig::from_env().with_level(level),
        writer,
    ));
}

fn install_level(logger: Logger) {
    set_logger(logger.clone());
    logger
        .trace()
        .msgf(format_args!("Set global log value to {}", logger.level()));
}

/// Replace the global logger.
pub fn set_logger(logger: Logger) {
    GLOBAL.store(Arc::new(logger));
}

/// Current global logger.
///
/// This is also what a [`Context`](crate::Context) without a bound logger resolves to.
pub fn logger() -> Logger {
    Logger::clone(&GLOBAL.load())
}

/// Current global level.
pub fn level() -> Severity {
    GLOBAL.load().level()
}

/// Derive a child of the global logger.
pub fn with() -> WithFields {
    logger().with()
}

pub fn trace() -> Event {
    logger().trace()
}

pub fn debug() -> Event {
    logger().debug()
}

pub fn info() -> Event {
    logger().info()
}

pub fn error() -> Event {
    logger().error()
}

/// FATAL event on the global logger. Only logs; the process keeps running.
pub fn fatal() -> Event {
    logger().fatal()
}

/// Run `f` only when the global level is TRACE.
pub fn trace_fn(f: impl FnOnce()) {
    if level() == Severity::Trace {
        f();
    }
}

pub fn tracef(args: fmt::Arguments<'_>) {
    logger().log(Severity::Trace, args);
}

pub fn debugf(args: fmt::Arguments<'_>) {
    logger().log(Severity::Debug, args);
}

pub fn infof(args: fmt::Arguments<'_>) {
    logger().log(Severity::Info, args);
}

pub fn errorf(args: fmt::Arguments<'_>) {
    logger().log(Severity::Error, args);
}

/// TRACE message made of the values separated by spaces, newline-terminated.
pub fn traceln(values: &[&dyn fmt::Display]) {
    let event = trace();
    if !event.enabled() {
        return;
    }
    let mut message = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    message.push('\n');
    event.msg(&message);
}

/// Write a line to stdout, ignoring level, fields and format.
///
/// For user-facing output such as CLI banners, not diagnostics.
pub fn print(args: fmt::Arguments<'_>) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{}", args);
}

/// Formatted TRACE message on the global logger.
#[macro_export]
macro_rules! tracef {
    ($($arg:tt)*) => {
        $crate::logging::tracef(format_args!($($arg)*))
    };
}

/// Formatted DEBUG message on the global logger.
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)*) => {
        $crate::logging::debugf(format_args!($($arg)*))
    };
}

/// Formatted INFO message on the global logger.
#[macro_export]
macro_rules! infof {
    ($($arg:tt)*) => {
        $crate::logging::infof(format_args!($($arg)*))
    };
}

/// Formatted ERROR message on the global logger.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::logging::errorf(format_args!($($arg)*))
    };
}

/// Space-separated values as a TRACE message.
#[macro_export]
macro_rules! traceln {
    ($($value:expr),* $(,)?) => {
        $crate::logging::traceln(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Plain line to stdout; see [`logging::print`](crate::logging::print).
#[macro_export]
macro_rules! plain {
    ($($arg:tt)*) => {
        $crate::logging::print(format_args!($($arg)*))
    };
}

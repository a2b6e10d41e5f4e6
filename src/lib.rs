//! ctxlog - process-wide structured logging with request-scoped loggers.
//!
//! The crate keeps one global [`Logger`] configured from the environment and
//! lets every request carry its own enriched copy in a [`Context`]. HTTP
//! middleware assigns request ids, binds them to the request logger and emits
//! one access log event per request.
//!
//! # Features
//!
//! - **Leveled logging**: TRACE, DEBUG, INFO, ERROR and FATAL with a global level
//! - **Console or JSON output**: switched with `TL_LOG_JSON`
//! - **Context loggers**: per-request loggers that fall back to the global one
//! - **Access logging**: duration, status and, for slow requests, the JSON body
//!
//! # Example
//!
//! ```rust,ignore
//! use ctxlog::middleware::{handler_fn, AccessLog, MiddlewareChain, RequestId, RequestIdLogging};
//!
//! ctxlog::set_level(ctxlog::Severity::Debug);
//! ctxlog::info().str("key", "value").msg("starting");
//!
//! let handler = MiddlewareChain::new()
//!     .add(RequestId::new())
//!     .add(RequestIdLogging)
//!     .add(AccessLog::new(1000))
//!     .handler(handler_fn(|req, w| Box::pin(async move {
//!         req.context().logger().debug().msg("hello");
//!         let _ = w.write_all(b"hello");
//!     })));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! ctxlog::server::serve(listener, handler, std::future::pending()).await?;
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod context;
pub mod core;
pub mod level;
pub mod logging;
pub mod middleware;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use context::Context;
pub use level::Severity;
pub use logging::{
    debug, debugf, error, errorf, fatal, info, infof, logger, print, set_level,
    set_level_with_writer, set_logger, trace, trace_fn, tracef, traceln, with, Event, Logger,
};

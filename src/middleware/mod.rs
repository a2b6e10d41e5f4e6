//! Middleware pipeline for request processing.
//!
//! A [`Middleware`] wraps the rest of the pipeline: it receives the request,
//! the response writer and a [`Next`] handle, and decides what happens before
//! and after calling [`Next::run`]. Stages communicate through the request's
//! [`Context`](crate::Context).
//!
//! # Example
//!
//! ```rust,ignore
//! use ctxlog::middleware::{handler_fn, AccessLog, MiddlewareChain, RequestId, RequestIdLogging};
//!
//! let handler = MiddlewareChain::new()
//!     .add(RequestId::new())
//!     .add(RequestIdLogging)
//!     .add(AccessLog::new(1000))
//!     .handler(handler_fn(|req, w| Box::pin(async move {
//!         req.context().logger().info().msg("handling");
//!         let _ = w.write_all(b"ok");
//!     })));
//! ```

mod chain;

pub mod access_log;
pub mod request_id;
pub mod request_id_logging;

pub use access_log::AccessLog;
pub use chain::{ChainHandler, MiddlewareChain};
pub use request_id::{request_id, RequestId, RequestIdValue};
pub use request_id_logging::RequestIdLogging;

use std::sync::Arc;

pub use futures_util::future::BoxFuture;

use crate::core::{Request, ResponseWriter};

/// Endpoint that produces a response for a request.
pub trait Handler: Send + Sync {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        (**self).serve(req, w)
    }
}

/// Handler built from a closure; see [`handler_fn`].
pub struct HandlerFn<F> {
    f: F,
}

/// Turn a closure returning a boxed future into a [`Handler`].
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(Request, &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> + Send + Sync,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(Request, &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> + Send + Sync,
{
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        (self.f)(req, w)
    }
}

/// Trait for implementing middleware.
///
/// # Lifecycle
///
/// ```text
/// Request → MW1 → MW2 → Handler
///            ↓      ↓      ↓
/// Response ← MW1 ← MW2 ←───┘
/// ```
///
/// A stage that never calls `next.run` short-circuits the pipeline; whatever
/// it wrote to `w` is the response.
pub trait Middleware: Send + Sync {
    /// Unique name for this middleware (used for logging/debugging).
    fn name(&self) -> &'static str;

    /// Priority for ordering in the chain.
    /// Lower values run first (outermost). Default is 0.
    ///
    /// Built-in stages:
    /// - -100: request id
    /// - -90: request id logger enrichment
    /// - -80: access log
    fn priority(&self) -> i32 {
        0
    }

    /// Process a request, usually by calling `next.run(req, w)`.
    fn handle<'a>(
        &'a self,
        req: Request,
        w: &'a mut dyn ResponseWriter,
        next: Next<'a>,
    ) -> BoxFuture<'a, ()>;
}

/// The remainder of the pipeline after the current stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
    endpoint: &'a dyn Handler,
}

impl<'a> Next<'a> {
    pub(crate) fn new(middlewares: &'a [Arc<dyn Middleware>], endpoint: &'a dyn Handler) -> Self {
        Self {
            middlewares,
            endpoint,
        }
    }

    /// Run the remaining stages and the endpoint.
    ///
    /// `w` may be a shorter-lived writer than the one this stage received,
    /// typically a decorator around it.
    pub fn run<'w>(self, req: Request, w: &'w mut dyn ResponseWriter) -> BoxFuture<'w, ()>
    where
        'a: 'w,
    {
        match self.middlewares.split_first() {
            Some((first, rest)) => first.handle(req, w, Next::new(rest, self.endpoint)),
            None => self.endpoint.serve(req, w),
        }
    }

    /// Number of stages left before the endpoint.
    pub fn remaining(&self) -> usize {
        self.middlewares.len()
    }
}

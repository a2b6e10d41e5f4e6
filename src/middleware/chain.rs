//! Middleware chain for composing multiple middleware.

use std::sync::Arc;

use super::{BoxFuture, Handler, Middleware, Next};
use crate::core::{Request, ResponseWriter};

/// A chain of middleware that processes requests in order.
///
/// Middleware are ordered by priority (lowest first, i.e. outermost).
/// Stages with equal priority keep insertion order.
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    /// Create a new empty middleware chain.
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add a middleware to the chain.
    ///
    /// Middleware are automatically sorted by priority.
    pub fn add<M: Middleware + 'static>(self, middleware: M) -> Self {
        self.add_arc(Arc::new(middleware))
    }

    /// Add a middleware wrapped in Arc to the chain.
    pub fn add_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self.middlewares.sort_by_key(|m| m.priority());
        self
    }

    /// Get the number of middleware in the chain.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Get middleware names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    /// Run a request through every stage and then `endpoint`.
    pub fn process<'a>(
        &'a self,
        req: Request,
        w: &'a mut dyn ResponseWriter,
        endpoint: &'a dyn Handler,
    ) -> BoxFuture<'a, ()> {
        Next::new(&self.middlewares, endpoint).run(req, w)
    }

    /// Wrap `endpoint` so the whole chain becomes a single [`Handler`].
    pub fn handler<H: Handler + 'static>(self, endpoint: H) -> ChainHandler {
        ChainHandler {
            chain: self,
            endpoint: Box::new(endpoint),
        }
    }
}

impl Default for MiddlewareChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MiddlewareChain {
    fn clone(&self) -> Self {
        Self {
            middlewares: self.middlewares.clone(),
        }
    }
}

/// A [`MiddlewareChain`] bound to its endpoint.
pub struct ChainHandler {
    chain: MiddlewareChain,
    endpoint: Box<dyn Handler>,
}

impl ChainHandler {
    /// Get middleware names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.chain.names()
    }
}

impl Handler for ChainHandler {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        self.chain.process(req, w, self.endpoint.as_ref())
    }
}

//! Request-scoped context.
//!
//! A [`Context`] is an immutable chain of values. Deriving a context never
//! changes the original; lookups walk from the newest value to the oldest, so
//! the nearest binding of a type wins. Values are keyed by their type, like
//! `http::Extensions`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::logging::{self, Logger};

/// Immutable, cheaply clonable carrier of request-scoped values.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

struct Node {
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

impl Context {
    /// Empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context carrying `value`.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Node {
                value: Box::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Nearest value of type `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            if let Some(value) = current.value.downcast_ref::<T>() {
                return Some(value);
            }
            node = current.parent.as_deref();
        }
        None
    }

    /// Derive a context carrying `logger`.
    pub fn with_logger(&self, logger: Logger) -> Self {
        self.with_value(logger)
    }

    /// Nearest bound logger, or the global logger when none is bound.
    pub fn logger(&self) -> Logger {
        self.value::<Logger>()
            .cloned()
            .unwrap_or_else(logging::logger)
    }

    /// Number of values in the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            depth += 1;
            node = current.parent.as_deref();
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .finish()
    }
}

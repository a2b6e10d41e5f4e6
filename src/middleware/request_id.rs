//! Request id assignment.
//!
//! Every request gets an opaque id before any logger enrichment happens. An
//! upstream `X-Request-Id` header is honoured as is; otherwise the id is
//! `<host>/<random>-<seq>`, where the prefix is fixed for the process and
//! `seq` is a six-digit, zero-padded process-wide counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

use uuid::Uuid;

use super::{BoxFuture, Middleware, Next};
use crate::context::Context;
use crate::core::{Request, ResponseWriter};

static PREFIX: LazyLock<String> = LazyLock::new(|| {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}/{}", hostname(), &random[..10])
});

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

/// Request id stored in the request context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestIdValue(pub String);

impl RequestIdValue {
    /// Fresh process-unique id.
    pub fn generate() -> Self {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) + 1;
        Self(format!("{}-{:06}", *PREFIX, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Request id of the request owning `ctx`, if the [`RequestId`] stage ran.
pub fn request_id(ctx: &Context) -> Option<&str> {
    ctx.value::<RequestIdValue>().map(RequestIdValue::as_str)
}

/// Middleware that assigns a request id and stores it in the context.
#[derive(Clone, Copy, Debug)]
pub struct RequestId {
    trust_header: bool,
}

impl RequestId {
    /// Honour incoming `X-Request-Id` headers.
    pub fn new() -> Self {
        Self { trust_header: true }
    }

    /// Always generate, ignoring `X-Request-Id`.
    pub fn generate_only() -> Self {
        Self { trust_header: false }
    }

    fn resolve(&self, req: &Request) -> RequestIdValue {
        match req.request_id_header() {
            Some(id) if self.trust_header => RequestIdValue(id.to_string()),
            _ => RequestIdValue::generate(),
        }
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for RequestId {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn handle<'a>(
        &'a self,
        mut req: Request,
        w: &'a mut dyn ResponseWriter,
        next: Next<'a>,
    ) -> BoxFuture<'a, ()> {
        let id = self.resolve(&req);
        let ctx = req.context().with_value(id);
        req.set_context(ctx);
        next.run(req, w)
    }
}

//! Access logging middleware.
//!
//! Emits one INFO event per request once the downstream handler returns:
//!
//! ```json
//! {"level":"info","time":"...","request_id":"abc123","duration_ms":5,"method":"GET","path":"/items","query":"x=1","status":200,"message":"request"}
//! ```
//!
//! Requests slower than the configured threshold get `"long_query":true` and,
//! when the request carried a small JSON body, the body itself embedded
//! verbatim under `body`.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use url::form_urlencoded;

use super::{BoxFuture, Middleware, Next};
use crate::config::AccessLogConfig;
use crate::core::{Request, ResponseWriter, StatusRecorder};

/// Bodies at or above this declared size are never buffered.
pub const MAX_BODY_SIZE: u64 = 20 * 1024;

/// Field name of the user on enriched loggers.
pub const USER_FIELD: &str = "user";

/// Extracts the user name of a request; `None` or empty means anonymous.
pub type UserNameFn = dyn Fn(&Request) -> Option<String> + Send + Sync;

/// Access logging middleware.
#[derive(Clone)]
pub struct AccessLog {
    long_query_ms: u64,
    user_name: Option<Arc<UserNameFn>>,
}

impl AccessLog {
    /// Create with a long-query threshold in milliseconds.
    pub fn new(long_query_ms: u64) -> Self {
        Self {
            long_query_ms,
            user_name: None,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: &AccessLogConfig) -> Self {
        Self::new(config.long_query_ms)
    }

    /// Add a `user` field to the request logger when `f` yields a name.
    pub fn with_user_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) -> Option<String> + Send + Sync + 'static,
    {
        self.user_name = Some(Arc::new(f));
        self
    }

    /// Long-query threshold in milliseconds.
    pub fn long_query_ms(&self) -> u64 {
        self.long_query_ms
    }

    fn user_name(&self, req: &Request) -> Option<String> {
        self.user_name
            .as_ref()
            .and_then(|f| f(req))
            .filter(|name| !name.is_empty())
    }
}

impl Default for AccessLog {
    fn default() -> Self {
        Self::from_config(&AccessLogConfig::default())
    }
}

impl std::fmt::Debug for AccessLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessLog")
            .field("long_query_ms", &self.long_query_ms)
            .field("user_name", &self.user_name.is_some())
            .finish()
    }
}

/// Only small, declared-length JSON bodies are worth keeping around.
fn should_buffer(req: &Request) -> bool {
    req.content_type() == Some("application/json")
        && req.content_length().is_some_and(|len| len < MAX_BODY_SIZE)
}

/// Query string decoded and re-encoded with keys sorted.
///
/// Values of a repeated key keep their order. Escaping follows the usual
/// query escaper: `~` is left alone and `*` is percent-encoded.
pub fn canonical_query(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let mut pairs: Vec<(Cow<'_, str>, Cow<'_, str>)> =
        form_urlencoded::parse(raw.as_bytes()).collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
        .replace("%7E", "~")
        .replace('*', "%2A")
}

fn is_json(body: &[u8]) -> bool {
    serde_json::from_slice::<serde::de::IgnoredAny>(body).is_ok()
}

impl Middleware for AccessLog {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn priority(&self) -> i32 {
        -80
    }

    fn handle<'a>(
        &'a self,
        mut req: Request,
        w: &'a mut dyn ResponseWriter,
        next: Next<'a>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let start = Instant::now();

            let mut logger = req.context().logger();
            if let Some(user) = self.user_name(&req) {
                logger = logger.with().str(USER_FIELD, &user).logger();
            }
            let ctx = req.context().with_logger(logger);
            req.set_context(ctx.clone());

            let mut body: Option<Bytes> = None;
            if should_buffer(&req) {
                match req.collect_body_limited(MAX_BODY_SIZE as usize).await {
                    Ok(bytes) => body = Some(bytes),
                    Err(e) => ctx
                        .logger()
                        .debug()
                        .err(&e)
                        .msg("failed to buffer request body"),
                }
            }

            let method = req.method().clone();
            let path = req.path().to_string();
            let query = canonical_query(req.query());

            let mut recorder = StatusRecorder::new(w);
            next.run(req, &mut recorder).await;

            let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            let mut event = ctx
                .logger()
                .info()
                .uint("duration_ms", duration_ms)
                .str("method", method.as_str())
                .str("path", &path)
                .str("query", &query)
                .uint("status", u64::from(recorder.status_code()));

            if duration_ms > self.long_query_ms {
                event = event.bool("long_query", true);
                if let Some(body) = body.as_deref().filter(|b| is_json(b)) {
                    event = event.raw_json("body", body);
                }
            }

            event.msg("request");
        })
    }
}

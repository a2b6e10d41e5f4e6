//! Test helpers and utilities

use std::time::Duration;

use ctxlog::config::LoggingConfig;
use ctxlog::core::{Request, ResponseWriter, X_REQUEST_ID};
use ctxlog::logging::{Logger, MemoryWriter};
use ctxlog::middleware::{
    handler_fn, request_id, AccessLog, BoxFuture, Middleware, MiddlewareChain, Next, RequestId,
    RequestIdLogging,
};
use ctxlog::Severity;
use http::{HeaderValue, StatusCode};
use reqwest::Client;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Binds a capture logger to every request, outside of all other stages.
struct BindLogger(Logger);

impl Middleware for BindLogger {
    fn name(&self) -> &'static str {
        "bind_logger"
    }

    fn priority(&self) -> i32 {
        -1000
    }

    fn handle<'a>(
        &'a self,
        mut req: Request,
        w: &'a mut dyn ResponseWriter,
        next: Next<'a>,
    ) -> BoxFuture<'a, ()> {
        let ctx = req.context().with_logger(self.0.clone());
        req.set_context(ctx);
        next.run(req, w)
    }
}

/// Query parameter of the echo endpoint, if present.
fn param(req: &Request, name: &str) -> Option<u64> {
    url::form_urlencoded::parse(req.query()?.as_bytes())
        .find(|(k, _)| k == name)
        .and_then(|(_, v)| v.parse().ok())
}

/// In-process server running the full middleware chain in front of an echo endpoint.
///
/// The endpoint honours `?status=<code>` and `?sleep_ms=<ms>`, returns the
/// request id in `X-Request-Id` and echoes the request body.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    sink: MemoryWriter,
    shutdown: Option<oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn start(long_query_ms: u64) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let sink = MemoryWriter::new();
        let logger = Logger::with_writer(
            LoggingConfig {
                level: Severity::Debug,
                json: true,
            },
            sink.clone(),
        );

        let handler = MiddlewareChain::new()
            .add(BindLogger(logger))
            .add(RequestId::new())
            .add(RequestIdLogging)
            .add(
                AccessLog::new(long_query_ms)
                    .with_user_name(|req| req.header("x-user").map(str::to_string)),
            )
            .handler(handler_fn(|req, w| {
                Box::pin(async move {
                    if let Some(ms) = param(&req, "sleep_ms") {
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                    }
                    let status = param(&req, "status")
                        .and_then(|code| StatusCode::from_u16(code as u16).ok());

                    if let Some(id) = request_id(req.context()) {
                        if let Ok(value) = HeaderValue::from_str(id) {
                            w.headers_mut().insert(&X_REQUEST_ID, value);
                        }
                    }
                    req.context().logger().debug().msg("echo");

                    if let Some(status) = status {
                        w.write_header(status);
                    }
                    let body = req.into_bytes().await.unwrap_or_default();
                    let _ = w.write_all(&body);
                })
            }));

        let (tx, rx) = oneshot::channel();
        tokio::spawn(ctxlog::server::serve(listener, handler, async {
            let _ = rx.await;
        }));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{}", addr),
            client,
            sink,
            shutdown: Some(tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Every captured log line.
    pub fn logs(&self) -> Vec<Value> {
        self.sink.json_lines()
    }

    /// Captured access log lines.
    pub fn access_logs(&self) -> Vec<Value> {
        self.logs()
            .into_iter()
            .filter(|line| line["message"] == "request")
            .collect()
    }

    /// The single access log line written so far.
    pub fn last_access_log(&self) -> Value {
        let mut lines = self.access_logs();
        assert_eq!(lines.len(), 1, "expected one access log line: {:?}", lines);
        lines.remove(0)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

use std::io;

use http::{HeaderValue, StatusCode};
use tokio::net::TcpListener;

use ctxlog::config::{env_opt, Config};
use ctxlog::core::{write_json, X_REQUEST_ID};
use ctxlog::middleware::{
    handler_fn, request_id, AccessLog, MiddlewareChain, RequestId, RequestIdLogging,
};
use ctxlog::{debugf, errorf, infof, plain, tracef, traceln};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    ctxlog::logging::init();

    plain!("This is a plain print (no level, no timestamp)");

    tracef!("This is a trace message: {}", 1);
    debugf!("This is a debug message: {}", 2);
    infof!("This is an info message: {}", 3);
    errorf!("This is an error message: {}", 4);

    traceln!("Traceln:", "multiple", "args", 123);

    ctxlog::info()
        .str("key", "value")
        .int("count", 42)
        .msg("Structured logging example");
    ctxlog::debug()
        .str("user", "alice")
        .bool("active", true)
        .msg("User status");
    ctxlog::error()
        .str("op", "test")
        .msg("Error without an error value");
    ctxlog::error()
        .err(&io::Error::new(io::ErrorKind::NotFound, "config.toml missing"))
        .str("op", "load")
        .msg("Error with an error value");

    config.log_summary();

    if let Some(addr) = env_opt("LISTEN_ADDR") {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(serve_echo(&addr, config))?;
    }

    plain!("Done!");
    Ok(())
}

/// Echo the request body back behind the full middleware chain.
async fn serve_echo(addr: &str, config: Config) -> ctxlog::core::Result<()> {
    let listener = TcpListener::bind(addr).await?;

    let handler = MiddlewareChain::new()
        .add(RequestId::new())
        .add(RequestIdLogging)
        .add(AccessLog::from_config(&config.access_log).with_user_name(|req| {
            req.header("x-user").map(str::to_string)
        }))
        .handler(handler_fn(|mut req, w| {
            Box::pin(async move {
                let ctx = req.context().clone();
                let id = request_id(&ctx).unwrap_or_default().to_string();
                ctx.logger().debug().str("path", req.path()).msg("echo");

                match req.collect_body().await {
                    Ok(body) => {
                        if let Ok(value) = HeaderValue::from_str(&id) {
                            w.headers_mut().insert(&X_REQUEST_ID, value);
                        }
                        let _ = w.write_all(&body);
                    }
                    Err(e) => {
                        ctx.logger().error().err(&e).msg("failed to read body");
                        let _ = write_json(w, StatusCode::BAD_REQUEST, br#"{"error":"bad body"}"#);
                    }
                }
            })
        }));

    plain!("Listening on http://{} (Ctrl-C to stop)", listener.local_addr()?);

    ctxlog::server::serve(listener, handler, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

//! HTTP host for [`Handler`]s.
//!
//! Accepts TCP connections, serves HTTP/1.1 and HTTP/2 on them with hyper and
//! drives the handler once per request into a [`ResponseBuffer`].

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use tokio::net::{TcpListener, TcpStream};

use crate::core::{Request, ResponseBuffer, Result};
use crate::logging;
use crate::middleware::Handler;

/// Serve `handler` on `listener` until `shutdown` resolves.
///
/// Fails only if the listener's address cannot be read. Accept errors are
/// logged and the loop keeps going. Connections already
/// accepted finish on their own after shutdown.
pub async fn serve<H, F>(listener: TcpListener, handler: H, shutdown: F) -> Result<()>
where
    H: Handler + 'static,
    F: Future<Output = ()>,
{
    let handler = Arc::new(handler);
    let local_addr = listener.local_addr()?;
    logging::info()
        .display("addr", local_addr)
        .msg("listening");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, remote_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        logging::error().err(&e).msg("accept error");
                        continue;
                    }
                };

                let _ = stream.set_nodelay(true);

                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    serve_connection(stream, remote_addr, handler).await;
                });
            }
            _ = &mut shutdown => {
                logging::debug().msg("shutdown requested, stopping accept loop");
                break;
            }
        }
    }

    Ok(())
}

async fn serve_connection<H: Handler + 'static>(
    stream: TcpStream,
    remote_addr: SocketAddr,
    handler: Arc<H>,
) {
    let service = service_fn(move |req| {
        let handler = Arc::clone(&handler);
        async move { Ok::<_, Infallible>(respond(handler.as_ref(), req).await) }
    });

    let io = TokioIo::new(stream);
    if let Err(err) = auto::Builder::new(TokioExecutor::new())
        .serve_connection(io, service)
        .await
    {
        logging::debug()
            .display("remote_addr", remote_addr)
            .err(err.as_ref())
            .msg("connection error");
    }
}

/// Run `handler` for one hyper request and collect its response.
pub async fn respond<H>(handler: &H, req: http::Request<Incoming>) -> http::Response<Full<Bytes>>
where
    H: Handler + ?Sized,
{
    let mut buf = ResponseBuffer::new();
    handler.serve(Request::from(req), &mut buf).await;
    buf.into_response()
}

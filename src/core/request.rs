//! HTTP request abstraction for middleware and handlers.

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Method, Uri};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, Limited};

use super::error::{BoxError, Error, Result};
use crate::context::Context;

/// Request body: a boxed stream of byte chunks.
pub type Body = UnsyncBoxBody<Bytes, BoxError>;

/// Header carrying an upstream request id.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Body that yields `bytes` once.
pub fn full_body(bytes: impl Into<Bytes>) -> Body {
    Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body without data.
pub fn empty_body() -> Body {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// HTTP request flowing through the middleware chain.
///
/// Besides the usual parts it carries a [`Context`]; stages derive a new
/// context and install it with [`Request::set_context`] so later stages and the
/// handler observe it.
///
/// Note: Clone is intentionally not derived; the body is a one-shot stream.
pub struct Request {
    method: Method,
    uri: Uri,
    version: http::Version,
    headers: HeaderMap,
    body: Body,
    context: Context,
}

impl Request {
    /// Create a request with an in-memory body.
    #[inline]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self::with_body(method, uri, headers, full_body(body))
    }

    /// Create a request with a streaming body.
    pub fn with_body(method: Method, uri: Uri, headers: HeaderMap, body: Body) -> Self {
        Self {
            method,
            uri,
            version: http::Version::HTTP_11,
            headers,
            body,
            context: Context::background(),
        }
    }

    /// Get the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the request path, still percent-encoded.
    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Get the raw query string.
    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Get the full URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Get the HTTP version.
    #[inline]
    pub fn version(&self) -> http::Version {
        self.version
    }

    /// Set the HTTP version.
    #[inline]
    pub fn set_version(&mut self, version: http::Version) {
        self.version = version;
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a mutable reference to headers.
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Get a header value by name.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get Content-Type header.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Get declared Content-Length.
    #[inline]
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }

    /// Get X-Request-ID header.
    #[inline]
    pub fn request_id_header(&self) -> Option<&str> {
        self.headers
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }

    /// Request-scoped context.
    #[inline]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Install a derived context.
    #[inline]
    pub fn set_context(&mut self, context: Context) {
        self.context = context;
    }

    /// Builder-style [`Request::set_context`].
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Get a mutable reference to the body stream.
    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Take the body, leaving an empty one.
    pub fn take_body(&mut self) -> Body {
        std::mem::replace(&mut self.body, empty_body())
    }

    /// Replace the body with in-memory bytes.
    pub fn set_body(&mut self, bytes: impl Into<Bytes>) {
        self.body = full_body(bytes);
    }

    /// Read the whole body and put back a replayable copy, so whoever reads
    /// the body next still sees the same bytes.
    pub async fn collect_body(&mut self) -> Result<Bytes> {
        let collected = self.take_body().collect().await.map_err(Error::Body)?;
        let bytes = collected.to_bytes();
        self.set_body(bytes.clone());
        Ok(bytes)
    }

    /// Like [`Request::collect_body`], failing once more than `limit` bytes arrive.
    ///
    /// On failure the body is left empty.
    pub async fn collect_body_limited(&mut self, limit: usize) -> Result<Bytes> {
        let limited: Body = Limited::new(self.take_body(), limit).boxed_unsync();
        let collected = limited.collect().await.map_err(Error::Body)?;
        let bytes = collected.to_bytes();
        self.set_body(bytes.clone());
        Ok(bytes)
    }

    /// Consume the request and read its body.
    pub async fn into_bytes(self) -> Result<Bytes> {
        let collected = self.body.collect().await.map_err(Error::Body)?;
        Ok(collected.to_bytes())
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl<B> From<http::Request<B>> for Request
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    fn from(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body: body.map_err(Into::into).boxed_unsync(),
            context: Context::background(),
        }
    }
}

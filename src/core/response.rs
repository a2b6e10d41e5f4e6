//! Response writers.
//!
//! Handlers produce a response by writing into a [`ResponseWriter`]: an
//! optional status line via [`ResponseWriter::write_header`], then body bytes.
//! The first status written is the one that counts; writing body bytes first
//! implies `200 OK`.

use std::io;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderValue, StatusCode};
use http_body_util::Full;

/// Outbound side of a request.
pub trait ResponseWriter: Send {
    /// Response headers; changes after the first write have no effect on the wire.
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Send the status line. Only the first call takes effect.
    fn write_header(&mut self, status: StatusCode);

    /// Append body bytes, sending `200 OK` first if no status was written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Write the whole buffer. An empty buffer still counts as a write.
    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        if buf.is_empty() {
            return self.write(buf).map(|_| ());
        }
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => return Err(io::ErrorKind::WriteZero.into()),
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }
}

/// In-memory [`ResponseWriter`] that becomes an `http::Response`.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, if any.
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Body written so far.
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Finish the response. A handler that wrote nothing produces an empty `200 OK`.
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for ResponseBuffer {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Write a complete JSON response.
pub fn write_json(w: &mut dyn ResponseWriter, status: StatusCode, body: &[u8]) -> io::Result<()> {
    w.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    w.write_header(status);
    w.write_all(body)
}

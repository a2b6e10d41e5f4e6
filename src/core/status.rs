//! Status capture for access logging.

use std::io;

use http::{HeaderMap, StatusCode};

use super::response::ResponseWriter;

/// Wraps a [`ResponseWriter`] and remembers the first status sent through it.
///
/// The status latches on the first `write_header` or `write`, whichever comes
/// first (a body write implies `200 OK`); later status changes are ignored.
/// Every call is still forwarded to the wrapped writer unchanged.
pub struct StatusRecorder<'a> {
    inner: &'a mut dyn ResponseWriter,
    status: Option<StatusCode>,
}

impl<'a> StatusRecorder<'a> {
    pub fn new(inner: &'a mut dyn ResponseWriter) -> Self {
        Self {
            inner,
            status: None,
        }
    }

    /// Latched status, `None` until something was written.
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Latched status as a number, 0 until something was written.
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status.map_or(0, |s| s.as_u16())
    }
}

impl ResponseWriter for StatusRecorder<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
        self.inner.write_header(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.inner.write(buf)
    }
}

//! Response observation.
//!
//! [`ResponseCapture`] decorates a [`ResponseWriter`] and records the status
//! code and the number of body bytes the handler wrote. Everything is
//! forwarded unchanged: the wrapped sink's own rules for duplicate status
//! lines, partial writes and I/O errors are exactly what the handler sees.
//!
//! The counters live in a separate [`ResponseStats`] so they can be pooled.
//! A capture only borrows a sink for one request, while a `ResponseStats`
//! slot outlives many requests:
//!
//! ```text
//! pool.acquire()            → Pooled<ResponseStats>      (reused slot)
//!        ↓ stats.wrap(sink)
//! ResponseCapture<'a>       → borrows sink + stats       (one request)
//!        ↓ handler writes through it, capture dropped
//! stats.status(), stats.bytes_written()                  (read for logging)
//! ```

use std::io;

use http::{HeaderMap, StatusCode};

use crate::response::ResponseWriter;

/// Captured status and byte count for one response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResponseStats {
    status: StatusCode,
    bytes_written: usize,
}

impl ResponseStats {
    pub fn new() -> Self {
        Self { status: StatusCode::OK, bytes_written: 0 }
    }

    /// Clears the counters and binds them to `sink`.
    ///
    /// This is how a pooled slot is reused: whatever an earlier request left
    /// behind, the capture starts from `200 OK` and zero bytes.
    pub fn wrap<'a>(&'a mut self, sink: &'a mut dyn ResponseWriter) -> ResponseCapture<'a> {
        *self = Self::new();
        ResponseCapture { inner: sink, stats: self }
    }

    /// The last status passed to `write_header`, or `200 OK` if none was.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

impl Default for ResponseStats {
    fn default() -> Self { Self::new() }
}

/// A [`ResponseWriter`] that records status and byte count on its way to
/// the sink it wraps. Obtain one with [`ResponseStats::wrap`].
pub struct ResponseCapture<'a> {
    inner: &'a mut dyn ResponseWriter,
    stats: &'a mut ResponseStats,
}

impl ResponseCapture<'_> {
    pub fn status(&self) -> StatusCode {
        self.stats.status
    }

    pub fn bytes_written(&self) -> usize {
        self.stats.bytes_written
    }
}

impl ResponseWriter for ResponseCapture<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        self.stats.status = status;
        self.inner.write_header(status);
    }

    // Counts what the handler asked to write, not what the sink accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stats.bytes_written += buf.len();
        self.inner.write(buf)
    }

    // One count for the whole buffer, however the sink splits it up.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.stats.bytes_written += buf.len();
        self.inner.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

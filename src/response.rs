//! The response-writing interface and the buffering sink behind it.
//!
//! Handlers never build a response value. They receive a `&mut dyn
//! ResponseWriter`, set headers, optionally pick a status, and write body
//! bytes. Anything in between (the request logger, for one) can wrap the
//! writer without the handler noticing.

use std::io;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use tracing::warn;

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// A sink for one HTTP response.
///
/// ```rust
/// use reqlog::{ResponseBuffer, ResponseWriter};
/// use http::{header, HeaderValue, StatusCode};
///
/// let mut w = ResponseBuffer::new();
/// w.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
/// w.write_header(StatusCode::CREATED);
/// w.write_all(b"created").unwrap();
/// assert_eq!(w.status(), StatusCode::CREATED);
/// ```
pub trait ResponseWriter: Send {
    /// Response headers. Only meaningful until the status line is written.
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sends the status line. Sinks decide what a second call means.
    fn write_header(&mut self, status: StatusCode);

    /// Writes body bytes, returning how many the sink accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Calls [`write`](Self::write) until `buf` is exhausted.
    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => return Err(io::ErrorKind::WriteZero.into()),
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }
}

// ── ResponseBuffer ────────────────────────────────────────────────────────────

/// A [`ResponseWriter`] that collects the whole response in memory.
///
/// The server hands one to the handler for every request and turns it into
/// a hyper response once the handler returns. Tests use it as a recorder.
///
/// Semantics follow the usual status-line rules: the first `write_header`
/// wins and later calls are ignored with a warning; the first `write`
/// without a prior `write_header` implies `200 OK`.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status sent so far, or `200 OK` if the handler never picked one.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let status = self.status();
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = status;
        *res.headers_mut() = self.headers;
        res
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
        match self.status {
            Some(sent) => warn!(%sent, ignored = %status, "superfluous write_header call"),
            None => self.status = Some(status),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ok() {
        let w = ResponseBuffer::new();
        assert_eq!(w.status(), StatusCode::OK);
        assert!(w.body().is_empty());
    }

    #[test]
    fn first_write_header_wins() {
        let mut w = ResponseBuffer::new();
        w.write_header(StatusCode::NOT_FOUND);
        w.write_header(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(w.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn write_commits_ok_status() {
        let mut w = ResponseBuffer::new();
        w.write_all(b"hello").unwrap();
        w.write_header(StatusCode::CREATED);
        assert_eq!(w.status(), StatusCode::OK);
        assert_eq!(w.body(), b"hello");
    }

    #[test]
    fn into_response_carries_status_headers_and_body() {
        let mut w = ResponseBuffer::new();
        w.headers_mut().insert("x-trace", http::HeaderValue::from_static("abc"));
        w.write_header(StatusCode::ACCEPTED);
        w.write_all(b"queued").unwrap();

        let res = w.into_response();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
        assert_eq!(res.headers()["x-trace"], "abc");
    }
}

//! Incoming HTTP request type.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

/// An incoming HTTP request, with its body already collected.
///
/// Handlers receive it by reference, so the middleware can read the method,
/// path and headers for its log event after the handler has returned.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl Request {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self { method, uri, headers, body }
    }

    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self::new(parts.method, parts.uri, parts.headers, body)
    }

    /// Starts a request for tests and demos: `Request::builder(Method::GET, "/test")`.
    ///
    /// A `uri` that doesn't parse becomes `/`. Use [`Request::new`] with a
    /// parsed [`Uri`] when that matters.
    pub fn builder(method: Method, uri: &str) -> RequestBuilder {
        RequestBuilder {
            method,
            uri: uri.parse().unwrap_or_else(|_| Uri::from_static("/")),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn query(&self) -> Option<&str> { self.uri.query() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    ///
    /// Returns the first value for `name`. Values that are not visible ASCII
    /// and names that are not valid header names both read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// Fluent builder for [`Request`]. Obtain via [`Request::builder`].
pub struct RequestBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestBuilder {
    /// Appends a header. Invalid names or values are skipped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::HeaderName::from_bytes(name.as_bytes()),
            http::HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Request {
        Request::new(self.method, self.uri, self.headers, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::builder(Method::GET, "/")
            .header("User-Agent", "curl/8.0")
            .build();

        assert_eq!(req.header("user-agent"), Some("curl/8.0"));
        assert_eq!(req.header("USER-AGENT"), Some("curl/8.0"));
        assert_eq!(req.header("x-request-id"), None);
    }

    #[test]
    fn header_returns_first_value() {
        let req = Request::builder(Method::GET, "/")
            .header("x-request-id", "first")
            .header("x-request-id", "second")
            .build();

        assert_eq!(req.header("x-request-id"), Some("first"));
    }

    #[test]
    fn invalid_header_name_reads_as_absent() {
        let req = Request::builder(Method::GET, "/").build();
        assert_eq!(req.header("not a header"), None);
    }

    #[test]
    fn path_excludes_query() {
        let req = Request::builder(Method::POST, "/users?page=2").body("x").build();

        assert_eq!(*req.method(), Method::POST);
        assert_eq!(req.path(), "/users");
        assert_eq!(req.query(), Some("page=2"));
        assert_eq!(req.body(), b"x");
    }

    #[test]
    fn builder_falls_back_to_root_on_bad_uri() {
        let req = Request::builder(Method::GET, "not a uri").build();

        assert_eq!(req.uri(), "/");
        assert_eq!(req.path(), "/");
        assert_eq!(req.query(), None);
    }
}

//! Middleware layer.
//!
//! Middleware is a [`Handler`](crate::Handler) that wraps another handler.
//! It sees the request before the inner handler does and can decorate the
//! response writer the inner handler writes to.
//!
//! Built-in middleware:
//! - [`RequestLogger`]: one structured event per request with method, path,
//!   status, bytes, latency and selected request headers

mod request_logger;

pub use request_logger::RequestLogger;

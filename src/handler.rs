//! Handler trait.
//!
//! # Why handlers borrow a writer
//!
//! A handler gets `&Request` and `&mut dyn ResponseWriter` instead of
//! returning a response value. That indirection is the point: middleware
//! such as [`RequestLogger`](crate::RequestLogger) can slip a decorator in
//! front of the real sink and watch what the handler writes, without the
//! handler or the sink knowing.
//!
//! ```text
//! Server::serve(logger)
//!        ↓ per request
//! logger.call(&req, &mut buffer)            ← RequestLogger<H>
//!        ↓ stats.wrap(&mut buffer)
//! inner.call(&req, &mut capture)            ← your handler
//!        ↓ writes land in `buffer`, counters in `stats`
//! ```
//!
//! Borrowed arguments mean the returned future borrows too, hence the
//! explicit `'a` on [`BoxFuture`]. `Send` lets tokio move it across threads.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::ResponseWriter;

/// A heap-allocated, type-erased future borrowing from the request.
pub type BoxFuture<'a, T = ()> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handles one request by writing to `w`.
///
/// Implement it directly for async handlers:
///
/// ```rust
/// use reqlog::{BoxFuture, Handler, Request, ResponseWriter};
///
/// struct Hello;
///
/// impl Handler for Hello {
///     fn call<'a>(&'a self, _req: &'a Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
///         Box::pin(async move {
///             let _ = w.write_all(b"Hello, World!");
///         })
///     }
/// }
/// ```
///
/// Synchronous closures go through [`handler_fn`].
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, req: &'a Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a>;
}

/// Shared handlers: keep an `Arc` yourself and hand a clone to the server.
impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call<'a>(&'a self, req: &'a Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        (**self).call(req, w)
    }
}

/// Wraps a synchronous closure as a [`Handler`].
///
/// ```rust
/// use reqlog::handler_fn;
///
/// let hello = handler_fn(|_req, w| {
///     let _ = w.write_all(b"Hello, World!");
/// });
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&Request, &mut dyn ResponseWriter) + Send + Sync + 'static,
{
    FnHandler(f)
}

/// A closure turned into a [`Handler`]. Obtain via [`handler_fn`].
pub struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&Request, &mut dyn ResponseWriter) + Send + Sync + 'static,
{
    fn call<'a>(&'a self, req: &'a Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move { (self.0)(req, w) })
    }
}

//! # reqlog
//!
//! Structured request logging for hyper services. One event per request,
//! nothing else.
//!
//! ## The contract
//!
//! [`RequestLogger`] wraps your handler. For every request it records the
//! method, path, status, response size, latency and a configurable set of
//! request headers, and emits them as a single structured event once the
//! handler returns. It never parses, routes, buffers, rewrites or rejects
//! anything: responses reach the client exactly as the handler wrote them.
//!
//! How it works:
//!
//! - Handlers write to a `&mut dyn` [`ResponseWriter`]. The logger slips a
//!   [`ResponseCapture`] in front of the real writer to count status and
//!   bytes on their way through.
//! - The counters live in [`ResponseStats`] slots recycled through a
//!   [`Pool`], so steady traffic does not allocate per request.
//! - Events go to a [`LogSink`]: [`TracingSink`] for `tracing`, or
//!   [`JsonSink`] for one JSON line per request.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use reqlog::{handler_fn, Config, RequestLogger, Server, TracingSink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), reqlog::Error> {
//!     tracing_subscriber::fmt::init();
//!
//!     let app = handler_fn(|req, w| {
//!         if req.path() != "/" {
//!             w.write_header(http::StatusCode::NOT_FOUND);
//!             return;
//!         }
//!         let _ = w.write_all(b"Hello, World!");
//!     });
//!
//!     let logger = RequestLogger::with_config(app, TracingSink, Config::from_env());
//!     Server::bind("0.0.0.0:8080")?.serve(logger).await
//! }
//! ```
//!
//! ## Known gap
//!
//! Events are emitted after the handler returns. A handler that panics, or a
//! request whose future is dropped because the client went away, produces
//! no event.

mod capture;
mod config;
mod error;
mod handler;
mod log;
mod pool;
mod request;
mod response;
mod server;

pub mod middleware;

pub use capture::{ResponseCapture, ResponseStats};
pub use config::{Config, LogFormat, ServerConfig, DEFAULT_HEADERS, HEADERS_ENV};
pub use error::Error;
pub use handler::{handler_fn, BoxFuture, FnHandler, Handler};
pub use log::{HeaderFields, JsonSink, LogEvent, LogSink, Message, TracingSink};
pub use middleware::RequestLogger;
pub use pool::{Pool, Pooled, DEFAULT_MAX_IDLE};
pub use request::{Request, RequestBuilder};
pub use response::{ResponseBuffer, ResponseWriter};
pub use server::Server;

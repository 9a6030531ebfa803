//! Per-request structured logging.

use std::sync::Arc;
use std::time::Instant;

use crate::capture::ResponseStats;
use crate::config::Config;
use crate::handler::{BoxFuture, Handler};
use crate::log::{LogEvent, LogSink};
use crate::pool::Pool;
use crate::request::Request;
use crate::response::ResponseWriter;

/// Wraps a [`Handler`] and emits one [`LogEvent`] per request it serves.
///
/// Each event carries the request method and path as its message, the
/// elapsed time, the status and byte count the handler wrote, and the
/// values of the configured request headers that were present.
///
/// ```rust,no_run
/// use reqlog::{handler_fn, RequestLogger, Server, TracingSink};
///
/// # async fn run() -> Result<(), reqlog::Error> {
/// let app = handler_fn(|_req, w| {
///     let _ = w.write_all(b"Hello, World!");
/// });
///
/// let mut logger = RequestLogger::new(app, TracingSink);
/// logger.add_header("x-forwarded-for");
///
/// Server::bind("0.0.0.0:8080")?.serve(logger).await
/// # }
/// ```
///
/// The capture list can only change through `&mut self`. Once the logger is
/// handed to a server it is shared and the list is frozen for the lifetime
/// of the process.
///
/// A handler that panics produces no event. The panic propagates as if the
/// logger were not there; the pooled counters are returned during unwinding.
pub struct RequestLogger<H> {
    handler: H,
    sink: Arc<dyn LogSink>,
    pool: Pool<ResponseStats>,
    headers: Vec<String>,
}

impl<H: Handler> RequestLogger<H> {
    /// Logs with the default capture list:
    /// `user-agent`, `x-request-id`, `x-api-key`.
    pub fn new(handler: H, sink: impl LogSink) -> Self {
        Self::with_config(handler, sink, Config::default())
    }

    pub fn with_config(handler: H, sink: impl LogSink, config: Config) -> Self {
        Self {
            handler,
            sink: Arc::new(sink),
            pool: Pool::new(),
            headers: config.headers,
        }
    }

    /// Appends a header name to the capture list. Duplicates are kept and
    /// logged twice.
    pub fn add_header(&mut self, name: impl Into<String>) {
        self.headers.push(name.into());
    }

    /// Replaces the capture list.
    pub fn set_headers<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = names.into_iter().map(Into::into).collect();
    }

    /// The current capture list, in order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn captured_headers<'r>(&'r self, req: &'r Request) -> Vec<(&'r str, &'r str)> {
        self.headers
            .iter()
            .filter_map(|name| {
                req.header(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| (name.as_str(), value))
            })
            .collect()
    }
}

impl<H: Handler> Handler for RequestLogger<H> {
    fn call<'a>(&'a self, req: &'a Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            let mut stats = self.pool.acquire();

            let mut capture = stats.wrap(w);
            let start = Instant::now();
            self.handler.call(req, &mut capture).await;
            let duration = start.elapsed();
            drop(capture);

            let event = LogEvent::new(
                req.method(),
                req.path(),
                duration,
                stats.status(),
                stats.bytes_written(),
                self.captured_headers(req),
            );
            self.sink.emit(&event);
        })
    }
}

//! Minimal reqlog example: one handler, one log line per request.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example hello
//!   ADDR=:3000 LOG_FORMAT=json cargo run --example hello
//!   REQLOG_HEADERS=user-agent,x-forwarded-for cargo run --example hello
//!
//! Try:
//!   curl -H 'x-request-id: abc123' http://localhost:8080/
//!   curl http://localhost:8080/missing

use std::sync::Arc;

use reqlog::{
    handler_fn, JsonSink, LogFormat, LogSink, Request, RequestLogger, ResponseWriter, Server,
    ServerConfig, TracingSink,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let sink: Arc<dyn LogSink> = match config.log_format {
        LogFormat::Json => Arc::new(JsonSink::stdout()),
        LogFormat::Pretty => Arc::new(TracingSink),
    };

    let logger = RequestLogger::with_config(handler_fn(root), sink, config.logger);

    let server = match Server::bind(&config.addr) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = server.serve(logger).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

// GET / → "Hello, World!"; anything else → 404 with no body.
fn root(req: &Request, w: &mut dyn ResponseWriter) {
    if req.path() != "/" {
        w.write_header(http::StatusCode::NOT_FOUND);
        return;
    }

    w.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    let _ = w.write_all(b"Hello, World!");
}

//! Structured request events and where they go.
//!
//! A [`LogEvent`] is a borrowed summary of one finished exchange. A
//! [`LogSink`] decides how it is recorded:
//!
//! | Sink | Output |
//! |---|---|
//! | [`TracingSink`] | one `tracing` info event, target `reqlog` |
//! | [`JsonSink`] | one JSON object per line on any `io::Write` |
//!
//! A JSON line looks like:
//!
//! ```text
//! {"level":"info","time":"2026-10-18T09:14:03.271Z","duration":0.412,"status":200,"bytes":13,"headers":{"user-agent":"curl/8.0"},"message":"GET /test"}
//! ```
//!
//! `time` is RFC 3339 UTC at the moment the event is written; `duration` is
//! in milliseconds.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use http::{Method, StatusCode};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{info, warn};

// ── LogEvent ──────────────────────────────────────────────────────────────────

/// Summary of one request/response cycle, emitted at info level.
#[derive(Debug)]
pub struct LogEvent<'a> {
    method: &'a Method,
    path: &'a str,
    duration: Duration,
    status: StatusCode,
    bytes: usize,
    headers: Vec<(&'a str, &'a str)>,
}

impl<'a> LogEvent<'a> {
    pub(crate) fn new(
        method: &'a Method,
        path: &'a str,
        duration: Duration,
        status: StatusCode,
        bytes: usize,
        headers: Vec<(&'a str, &'a str)>,
    ) -> Self {
        Self { method, path, duration, status, bytes, headers }
    }

    pub fn method(&self) -> &Method { self.method }
    pub fn path(&self) -> &str { self.path }
    pub fn duration(&self) -> Duration { self.duration }
    pub fn status(&self) -> StatusCode { self.status }
    pub fn bytes(&self) -> usize { self.bytes }

    /// Captured request headers, in capture-list order.
    pub fn headers(&self) -> HeaderFields<'_> {
        HeaderFields(&self.headers)
    }

    /// `"<METHOD> <path>"`, e.g. `GET /users/42`.
    pub fn message(&self) -> Message<'_> {
        Message { method: self.method, path: self.path }
    }

    fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry("duration", &(self.duration.as_nanos() as f64 / 1_000_000.0))?;
        map.serialize_entry("status", &self.status.as_u16())?;
        map.serialize_entry("bytes", &self.bytes)?;
        map.serialize_entry("headers", &self.headers())?;
        map.serialize_entry("message", &self.message())
    }
}

impl Serialize for LogEvent<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.serialize_fields(&mut map)?;
        map.end()
    }
}

/// The event message. Formats without allocating.
#[derive(Clone, Copy, Debug)]
pub struct Message<'a> {
    method: &'a Method,
    path: &'a str,
}

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

impl Serialize for Message<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The nested `headers` group of an event.
///
/// Serializes as a JSON object and displays as `{name="value", ...}`.
/// Duplicate names in the capture list show up twice.
#[derive(Clone, Copy, Debug)]
pub struct HeaderFields<'a>(&'a [(&'a str, &'a str)]);

impl<'a> HeaderFields<'a> {
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.0.iter().copied()
    }

    /// First captured value for `name`.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }
}

impl fmt::Display for HeaderFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value:?}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for HeaderFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ── LogSink ───────────────────────────────────────────────────────────────────

/// Receives one event per request.
///
/// `emit` runs on the request's task after the handler has finished, so
/// keep it cheap. It cannot fail from the middleware's point of view:
/// a sink that hits an error reports it itself.
pub trait LogSink: Send + Sync + 'static {
    fn emit(&self, event: &LogEvent<'_>);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn emit(&self, event: &LogEvent<'_>) {
        (**self).emit(event)
    }
}

/// Emits events through `tracing` at info level with target `reqlog`.
///
/// Output format belongs to whichever subscriber is installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, event: &LogEvent<'_>) {
        info!(
            target: "reqlog",
            duration = ?event.duration(),
            status = event.status().as_u16(),
            bytes = event.bytes(),
            headers = %event.headers(),
            "{}",
            event.message(),
        );
    }
}

/// Writes each event as one line of JSON.
///
/// Writes are serialised through a mutex so lines from concurrent requests
/// never interleave. Write failures are reported with `tracing::warn!` and
/// otherwise dropped.
#[derive(Debug)]
pub struct JsonSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send + 'static> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JsonSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> LogSink for JsonSink<W> {
    fn emit(&self, event: &LogEvent<'_>) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let result = serde_json::to_writer(&mut *writer, &JsonLine(event))
            .map_err(io::Error::from)
            .and_then(|()| writer.write_all(b"\n"));

        if let Err(e) = result {
            warn!(request = %event.message(), "failed to write request log: {e}");
        }
    }
}

struct JsonLine<'e, 'a>(&'e LogEvent<'a>);

impl Serialize for JsonLine<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("level", "info")?;
        map.serialize_entry("time", &Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))?;
        self.0.serialize_fields(&mut map)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event<'a>(method: &'a Method, headers: Vec<(&'a str, &'a str)>) -> LogEvent<'a> {
        LogEvent::new(method, "/test", Duration::from_micros(1500), StatusCode::OK, 13, headers)
    }

    #[test]
    fn message_is_method_and_path() {
        let method = Method::DELETE;
        let ev = LogEvent::new(&method, "/users/7", Duration::ZERO, StatusCode::NO_CONTENT, 0, vec![]);
        assert_eq!(ev.message().to_string(), "DELETE /users/7");
    }

    #[test]
    fn serializes_fields() {
        let method = Method::GET;
        let ev = event(&method, vec![("user-agent", "UA"), ("x-foo", "bar")]);

        let value = serde_json::to_value(&ev).unwrap();
        assert_eq!(value["duration"], 1.5);
        assert_eq!(value["status"], 200);
        assert_eq!(value["bytes"], 13);
        assert_eq!(value["message"], "GET /test");
        assert_eq!(value["headers"]["user-agent"], "UA");
        assert_eq!(value["headers"]["x-foo"], "bar");
        assert!(value.get("level").is_none());
    }

    #[test]
    fn headers_display_as_group() {
        let method = Method::GET;
        let ev = event(&method, vec![("user-agent", "UA"), ("x-request-id", "R")]);
        assert_eq!(ev.headers().to_string(), r#"{user-agent="UA", x-request-id="R"}"#);

        let empty = event(&method, vec![]);
        assert_eq!(empty.headers().to_string(), "{}");
    }

    #[test]
    fn json_sink_writes_one_line_per_event() {
        let sink = JsonSink::new(Vec::new());
        let method = Method::GET;
        sink.emit(&event(&method, vec![("x-api-key", "K")]));
        sink.emit(&event(&method, vec![]));

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["level"], "info");
        let time = first["time"].as_str().expect("time is a string");
        assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok(), "{time}");
        assert_eq!(first["headers"]["x-api-key"], "K");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["headers"], serde_json::json!({}));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn tracing_sink_emits_info_event_with_fields() {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let method = Method::GET;
        tracing::subscriber::with_default(subscriber, || {
            TracingSink.emit(&event(&method, vec![("user-agent", "UA"), ("x-foo", "bar")]));
        });

        let line = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert_eq!(line.lines().count(), 1, "{line}");
        assert!(line.contains(" INFO "), "{line}");
        assert!(line.contains("reqlog:"), "{line}");
        assert!(line.contains("GET /test"), "{line}");
        assert!(line.contains("duration=1.5ms"), "{line}");
        assert!(line.contains("status=200"), "{line}");
        assert!(line.contains("bytes=13"), "{line}");
        assert!(line.contains(r#"headers={user-agent="UA", x-foo="bar"}"#), "{line}");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn json_sink_swallows_write_errors() {
        let sink = JsonSink::new(Broken);
        let method = Method::GET;
        sink.emit(&event(&method, vec![]));
    }
}

//! Configuration values.
//!
//! [`Config`] is what [`RequestLogger`](crate::RequestLogger) needs: the list
//! of request headers to copy into each event. [`ServerConfig`] carries the
//! process-level settings the bundled demo reads at startup.
//!
//! Both are plain values. Build them once, before traffic starts.

use std::env;

/// Headers captured when nothing else is configured.
pub const DEFAULT_HEADERS: [&str; 3] = ["user-agent", "x-request-id", "x-api-key"];

/// Environment variable holding a comma-separated capture list.
pub const HEADERS_ENV: &str = "REQLOG_HEADERS";

/// Request-logger configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub headers: Vec<String>,
}

impl Config {
    /// Defaults, with the capture list replaced by `REQLOG_HEADERS` if set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(HEADERS_ENV) {
            Some(list) => Self { headers: parse_list(&list) },
            None => Self::default(),
        }
    }

    /// Appends one header name to the capture list.
    pub fn with_header(mut self, name: impl Into<String>) -> Self {
        self.headers.push(name.into());
        self
    }

    /// Replaces the capture list.
    pub fn with_headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = names.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { headers: DEFAULT_HEADERS.iter().map(|h| (*h).to_owned()).collect() }
    }
}

fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

// ── ServerConfig ──────────────────────────────────────────────────────────────

/// How request events are written.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    /// Through `tracing` and whatever subscriber the process installed.
    Pretty,
    /// One JSON object per line on stdout.
    Json,
}

/// Process settings for the demo server.
///
/// | Variable | Default | Meaning |
/// |---|---|---|
/// | `ADDR` | `0.0.0.0:8080` | listen address; `:port` means all interfaces |
/// | `LOG_FORMAT` | `pretty` | `json` for line-delimited JSON events |
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub addr: String,
    pub log_format: LogFormat,
    pub logger: Config,
}

impl ServerConfig {
    pub const DEFAULT_ADDR: &'static str = "0.0.0.0:8080";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let addr = match lookup("ADDR").filter(|a| !a.is_empty()) {
            Some(a) if a.starts_with(':') => format!("0.0.0.0{a}"),
            Some(a) => a,
            None => Self::DEFAULT_ADDR.to_owned(),
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self { addr, log_format, logger: Config::from_lookup(&lookup) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn default_headers() {
        assert_eq!(Config::default().headers, ["user-agent", "x-request-id", "x-api-key"]);
    }

    #[test]
    fn env_list_replaces_defaults() {
        let config = Config::from_lookup(lookup(&[(HEADERS_ENV, " x-foo, ,X-Bar ")]));
        assert_eq!(config.headers, ["x-foo", "X-Bar"]);
    }

    #[test]
    fn missing_env_keeps_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn builders_append_and_replace() {
        let config = Config::default().with_header("x-foo");
        assert_eq!(config.headers.last().map(String::as_str), Some("x-foo"));
        assert_eq!(config.headers.len(), 4);

        let config = config.with_headers(["x-only"]);
        assert_eq!(config.headers, ["x-only"]);
    }

    #[test]
    fn server_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.addr, "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.logger, Config::default());
    }

    #[test]
    fn bare_port_binds_all_interfaces() {
        let config = ServerConfig::from_lookup(lookup(&[("ADDR", ":9000"), ("LOG_FORMAT", "JSON")]));
        assert_eq!(config.addr, "0.0.0.0:9000");
        assert_eq!(config.log_format, LogFormat::Json);
    }
}

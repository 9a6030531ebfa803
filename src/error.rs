//! Unified error type.

use std::fmt;

/// The error type returned by reqlog's fallible operations.
///
/// The middleware itself never fails: sink errors travel back to the handler
/// exactly as the sink reported them. This type surfaces infrastructure
/// failures of the bundled server: parsing a listen address, binding to a
/// port, or accepting a connection.
#[derive(Debug)]
pub enum Error {
    /// The listen address could not be parsed as `host:port`.
    Addr(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addr(addr) => write!(f, "invalid socket address `{addr}`"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Addr(_) => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

//! Shared error type across statwatch crates.

use thiserror::Error;

use crate::metric::MetricType;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request or config.
    BadRequest,
    /// Sample older than the newest one already stored.
    OutOfOrder,
    /// Store no longer accepts writes.
    Stopped,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::OutOfOrder => "OUT_OF_ORDER",
            ClientCode::Stopped => "STOPPED",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unknown metric type: {0}")]
    UnknownMetricType(String),
    #[error("out of order sample for {metric}: last={last} got={got}")]
    OutOfOrder {
        metric: MetricType,
        last: i64,
        got: i64,
    },
    #[error("metric store stopped")]
    Stopped,
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("io: {0}")]
    Io(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MonitorError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            MonitorError::BadRequest(_) | MonitorError::UnknownMetricType(_) => {
                ClientCode::BadRequest
            }
            MonitorError::OutOfOrder { .. } => ClientCode::OutOfOrder,
            MonitorError::Stopped => ClientCode::Stopped,
            MonitorError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            MonitorError::Io(_) | MonitorError::Internal(_) => ClientCode::Internal,
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(e: std::io::Error) -> Self {
        MonitorError::Io(e.to_string())
    }
}

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error(
        "FusionSolar rejected the session (HTTP {status}), refresh `FUSIONSOLAR_COOKIE` from the dashboard"
    )]
    Authentication { status: u16 },

    #[error("FusionSolar request failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("malformed artifact `{path}`: {reason}")]
    MalformedData { path: PathBuf, reason: String },

    #[error("failed to access `{path}`")]
    Io {
        path: PathBuf,

        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("transport error")]
    Transport(#[source] ureq::Error),

    #[error("response body is not valid JSON")]
    InvalidBody(#[source] serde_json::Error),
}

impl Error {
    /// Classify a non-successful HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication { status },
            _ => Self::Upstream(UpstreamError::Status { status }),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MalformedData { path: path.into(), reason: reason.to_string() }
    }
}

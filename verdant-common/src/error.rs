//! Common error types for Verdant

/// Common result type for Verdant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Verdant services
///
/// `Display` and `std::error::Error` are implemented by hand because the
/// `SourceError` variant has a field named `source` that is a plain `String`,
/// which `thiserror`'s derive would otherwise treat as the error source.
#[derive(Debug)]
pub enum Error {
    /// Malformed sample offered to the sample store; rejected with no state change
    InvalidSample(String),

    /// A single environment source exceeded its per-fetch deadline
    SourceTimeout(String),

    /// A single environment source failed (network error, bad payload, empty result)
    SourceError { source: String, reason: String },

    /// Every environment source failed for the same coordinate; the cycle is abandoned
    AggregationFailed,

    /// The upload collaborator rejected a cycle's batch; the batch is not restored
    UploadFailed(String),

    /// Configuration loading or validation error
    Config(String),

    /// HTTP server errors
    Http(String),

    /// I/O operation error (wraps std::io::Error)
    Io(std::io::Error),

    /// Internal error
    Internal(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidSample(msg) => write!(f, "Invalid sample: {msg}"),
            Error::SourceTimeout(source) => write!(f, "Source '{source}' timed out"),
            Error::SourceError { source, reason } => {
                write!(f, "Source '{source}' failed: {reason}")
            }
            Error::AggregationFailed => {
                write!(f, "Aggregation failed: all environment sources failed")
            }
            Error::UploadFailed(msg) => write!(f, "Upload failed: {msg}"),
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
            Error::Http(msg) => write!(f, "HTTP error: {msg}"),
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

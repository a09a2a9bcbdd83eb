//! Error types for the digest pipeline.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! A topic missing from the digest is not an error; see [`crate::extract::Extraction`].

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors from the arXiv search client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the arXiv API (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Invalid query (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Atom feed could not be parsed
    #[error("Failed to parse feed: {0}")]
    Feed(String),

    /// Invalid endpoint URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Server { .. })
    }
}

/// Errors from the digest pipeline.
///
/// Every variant is fatal for the run that produced it.
#[derive(thiserror::Error, Debug)]
pub enum DigestError {
    /// Topic profiles or topic registry missing or malformed.
    #[error("Configuration error ({}): {message}", path.display())]
    Config {
        /// File the configuration was read from
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },

    /// No dated digest document matched the expected pattern.
    #[error("No digest matching {pattern} found in {}", dir.display())]
    NotFound {
        /// Directory that was scanned
        dir: PathBuf,
        /// Expected file name pattern
        pattern: String,
    },

    /// A version-control command failed or could not be started.
    #[error("Command `{command}` failed ({status}): {stderr}")]
    ExternalCommand {
        /// Full command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Filesystem operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Search backend failure
    #[error("Search error: {0}")]
    Client(#[from] ClientError),
}

impl DigestError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config { path: path.into(), message: message.into() }
    }

    /// Create an I/O error tied to a path.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    /// Create an external command error.
    #[must_use]
    pub fn command(
        command: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ExternalCommand {
            command: command.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }

    /// Short label for the failing stage, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::NotFound { .. } => "not_found",
            Self::ExternalCommand { .. } => "external_command",
            Self::Io { .. } => "io",
            Self::Serialization(_) => "serialization",
            Self::Client(_) => "search",
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for pipeline operations.
pub type DigestResult<T> = Result<T, DigestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_retryable() {
        assert!(ClientError::rate_limited(60).is_retryable());
        assert!(ClientError::server(503, "unavailable").is_retryable());

        assert!(!ClientError::bad_request("malformed query").is_retryable());
        assert!(!ClientError::Feed("eof".to_string()).is_retryable());
    }

    #[test]
    fn test_command_error_message_carries_context() {
        let err = DigestError::command("git push origin gh-pages", "exit status: 1", "rejected");
        let msg = err.to_string();
        assert!(msg.contains("git push origin gh-pages"));
        assert!(msg.contains("rejected"));
        assert_eq!(err.kind(), "external_command");
    }

    #[test]
    fn test_config_error_names_path() {
        let err = DigestError::config("topic.json", "not an array");
        assert!(err.to_string().contains("topic.json"));
        assert!(err.to_string().contains("not an array"));
    }
}

//! Unified error types for the web server.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the web server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Pod creation error.
    #[error("pod error: {0}")]
    Pod(#[from] PodError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage probe errors.
///
/// The `Display` output is returned verbatim to HTTP clients, so variants
/// carry the backend's message without an extra prefix.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend address could not be turned into a connection URL.
    #[error("invalid backend address {address}: {reason}")]
    InvalidAddress {
        /// Address as configured.
        address: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Error reported by the Redis client (refused, reset, rejected command).
    #[error("{0}")]
    Redis(#[from] redis::RedisError),

    /// The backend did not answer in time.
    #[error("probe timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Backend unreachable or rejected the probe.
    #[error("{0}")]
    Unavailable(String),
}

/// Pod creation errors.
#[derive(Error, Debug)]
pub enum PodError {
    /// Service-account credentials could not be read.
    #[error("failed to read credentials from {path}: {reason}")]
    Credentials {
        /// File that failed to load.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// The API server URL is malformed.
    #[error("invalid api url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request failed before a response was received.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API server answered with a non-success status.
    #[error("api server rejected pod creation: status={status}, body={body}")]
    Rejected {
        /// HTTP status returned by the API server.
        status: u16,
        /// Response body, usually a Kubernetes `Status` object.
        body: String,
    },

    /// Response did not contain the expected pod metadata.
    #[error("unexpected api response: {0}")]
    MalformedResponse(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_displays_message_verbatim() {
        let err = StorageError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn timeout_reports_milliseconds() {
        let err = StorageError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "probe timed out after 250ms");
    }

    #[test]
    fn server_error_wraps_storage_error() {
        let err: ServerError = StorageError::Unavailable("down".to_string()).into();
        assert_eq!(err.to_string(), "storage error: down");
    }
}

//! Error types for the imgflow client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ErrorEnvelope>;

/// Category of an [`ErrorEnvelope`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A client-side guard rejected the input before anything was sent
    ValidationError,
    /// No response was received
    NetworkError,
    /// The service answered with a non-success status or an unreadable body
    ServerError,
    /// The polling attempt budget ran out before a terminal status
    PollingTimeout,
    /// The caller aborted the operation
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::ServerError => "ServerError",
            ErrorKind::PollingTimeout => "PollingTimeout",
            ErrorKind::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error contract of the client
///
/// Every transport fault, non-success response and malformed body is turned
/// into one of these before it leaves the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ErrorEnvelope {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status code, when a response was received
    pub status: Option<u16>,
}

impl ErrorEnvelope {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerError, message)
    }

    pub fn polling_timeout(attempts: u32) -> Self {
        Self::new(
            ErrorKind::PollingTimeout,
            format!("no terminal status after {} attempt(s)", attempts),
        )
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Create an error from a non-success status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ServerError,
            message: message.into(),
            status: Some(status),
        }
    }

    /// Check if this error is a "not found" response
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Raised by a client-side guard; nothing reached the service
    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::ValidationError
    }

    pub fn is_network(&self) -> bool {
        self.kind == ErrorKind::NetworkError
    }
}

impl From<reqwest::Error> for ErrorEnvelope {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::server(format!("Failed to parse response: {}", err));
        }
        if let Some(status) = err.status() {
            return Self::api_error(status.as_u16(), err.to_string());
        }
        Self::network(format!("HTTP request failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let err = ErrorEnvelope::validation("empty operation list");
        assert_eq!(err.to_string(), "ValidationError: empty operation list");
    }

    #[test]
    fn test_api_error_is_server_kind() {
        let err = ErrorEnvelope::api_error(404, "Image not found");
        assert_eq!(err.kind, ErrorKind::ServerError);
        assert!(err.is_not_found());
        assert!(!ErrorEnvelope::api_error(500, "boom").is_not_found());
    }

    #[test]
    fn test_polling_timeout_message() {
        let err = ErrorEnvelope::polling_timeout(3);
        assert_eq!(err.kind, ErrorKind::PollingTimeout);
        assert!(err.message.contains('3'));
        assert_eq!(err.status, None);
    }
}

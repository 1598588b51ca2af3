//! Structured errors for the API boundary.
//!
//! Every network call resolves to either a payload or an [`ApiError`]; the
//! error is converted to view-local state by the caller and never crosses a
//! component boundary as a panic or an unhandled rejection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback shown when the server rejected a request without a message.
pub const GENERIC_FAILURE: &str = "Request failed. Please try again.";

/// Error category at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Local precondition failed; no request was sent.
    Validation,
    /// The request never reached the server (connect, DNS, timeout).
    Transport,
    /// The server responded with a failure envelope or a non-2xx status.
    Rejected,
    /// The response body could not be parsed.
    Decode,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Rejected => write!(f, "rejected"),
            ApiErrorKind::Decode => write!(f, "decode"),
        }
    }
}

/// Structured error with kind and a display-ready message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category.
    pub kind: ApiErrorKind,
    /// One-line summary suitable for an inline notice.
    pub message: String,
}

impl ApiError {
    /// Creates a new error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a local validation error (pre-network).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    /// Creates a server-unreachable error for the given base URL.
    pub fn transport(base_url: &str) -> Self {
        Self::new(
            ApiErrorKind::Transport,
            format!("Cannot reach the server at {base_url}. Is the backend running?"),
        )
    }

    /// Creates a rejection, preferring the server's message when present.
    pub fn rejected(message: Option<String>) -> Self {
        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => GENERIC_FAILURE.to_string(),
        };
        Self::new(ApiErrorKind::Rejected, message)
    }

    /// Creates a decode error; the raw parse failure goes to the log, the
    /// caller only ever sees the generic message.
    pub fn decode() -> Self {
        Self::new(ApiErrorKind::Decode, GENERIC_FAILURE)
    }

    /// Returns true if the request never reached the server.
    pub fn is_transport(&self) -> bool {
        self.kind == ApiErrorKind::Transport
    }

    /// Returns true if this is a local validation failure.
    pub fn is_validation(&self) -> bool {
        self.kind == ApiErrorKind::Validation
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result alias used throughout the API boundary.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_prefers_server_message() {
        let err = ApiError::rejected(Some("Invalid OTP".to_string()));
        assert_eq!(err.message, "Invalid OTP");
        assert_eq!(err.kind, ApiErrorKind::Rejected);
    }

    #[test]
    fn test_rejected_falls_back_on_blank_message() {
        let err = ApiError::rejected(Some("   ".to_string()));
        assert_eq!(err.message, GENERIC_FAILURE);
        assert_eq!(ApiError::rejected(None).message, GENERIC_FAILURE);
    }

    #[test]
    fn test_transport_message_names_the_host() {
        let err = ApiError::transport("http://localhost:9090/api");
        assert!(err.is_transport());
        assert!(err.message.contains("http://localhost:9090/api"));
    }
}

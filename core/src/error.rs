//! Error types for the catalog API client.
//!
//! # Design
//! Every failure a caller can observe is an `ApiError`, whichever layer it
//! started in. Validation errors are raised before any request leaves the
//! process. `Http` carries the numeric status and whatever body the server
//! returned. `Network` means no response came back at all. The normalized
//! `{message, code, details}` view is available through `Display`,
//! [`ApiError::code`] and [`ApiError::details`].

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors returned by the access layer, services and controllers.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Client-side validation rejected the input; no request was sent.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A single input check failed locally; no request was sent.
    #[error("{0}")]
    InvalidInput(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        details: Value,
    },

    /// The request never produced a response.
    #[error("{0}")]
    Network(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A single-record controller was asked to act before a record was loaded.
    #[error("no record loaded")]
    NotLoaded,
}

/// The `code` half of a normalized error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Status(u16),
    Network,
    Validation,
    Client,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Status(status) => write!(f, "{status}"),
            ErrorCode::Network => write!(f, "NETWORK_ERROR"),
            ErrorCode::Validation => write!(f, "VALIDATION_ERROR"),
            ErrorCode::Client => write!(f, "CLIENT_ERROR"),
        }
    }
}

impl ApiError {
    /// A single failed input check, displayed as the bare message.
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidInput(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Http { status, .. } => ErrorCode::Status(*status),
            ApiError::Network(_) => ErrorCode::Network,
            ApiError::Validation(_) | ApiError::InvalidInput(_) => ErrorCode::Validation,
            ApiError::Serialization(_) | ApiError::Deserialization(_) | ApiError::NotLoaded => {
                ErrorCode::Client
            }
        }
    }

    /// Parsed error body for `Http` errors, `None` for everything else.
    pub fn details(&self) -> Option<&Value> {
        match self {
            ApiError::Http { details, .. } => Some(details),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }
}

/// Failure of the underlying transport: DNS, connect, TLS, broken socket.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Network(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_every_violation() {
        let err = ApiError::Validation(vec![
            "First name is required".to_string(),
            "Last name is required".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: First name is required, Last name is required"
        );
        assert_eq!(err.code(), ErrorCode::Validation);
        assert!(err.details().is_none());
    }

    #[test]
    fn single_input_check_keeps_bare_message() {
        let err = ApiError::invalid("Invalid price value");
        assert_eq!(err.to_string(), "Invalid price value");
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[test]
    fn network_code_displays_as_network_error() {
        let err: ApiError = TransportError("connection refused".to_string()).into();
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.code().to_string(), "NETWORK_ERROR");
    }

    #[test]
    fn http_error_exposes_status_and_details() {
        let err = ApiError::Http {
            status: 404,
            message: "User not found".to_string(),
            details: serde_json::json!({"message": "User not found"}),
        };
        assert_eq!(err.code(), ErrorCode::Status(404));
        assert_eq!(err.code().to_string(), "404");
        assert!(err.is_not_found());
        assert_eq!(err.details().unwrap()["message"], "User not found");
    }
}

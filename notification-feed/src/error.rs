//! Error types for the notification feed client

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Message used when the server rejects a request without an `error` field
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Failure of a single HTTP call against the notification service
///
/// `Clone` so that one failed fetch can be handed to every reader that joined it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a status outside 2xx
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// Network failure, or a body that could not be parsed
    #[error("{message}")]
    TransportFailed { message: String },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        FetchError::TransportFailed {
            message: message.into(),
        }
    }

    /// Build a `RequestFailed` from an error body of the form `{"error": "..."}`
    pub fn from_error_body(status: u16, body: &Value) -> Self {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string();

        FetchError::RequestFailed { status, message }
    }

    /// User-facing message carried by this error
    pub fn message(&self) -> &str {
        match self {
            FetchError::RequestFailed { message, .. } => message,
            FetchError::TransportFailed { message } => message,
        }
    }

    /// HTTP status, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::RequestFailed { status, .. } => Some(*status),
            FetchError::TransportFailed { .. } => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::TransportFailed { .. })
    }
}

/// Kind of notification-mutating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    DeleteOne,
    DeleteAll,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::DeleteOne => write!(f, "delete notification"),
            MutationKind::DeleteAll => write!(f, "delete all notifications"),
        }
    }
}

/// A mutation whose remote call failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} failed: {source}")]
pub struct MutationError {
    pub kind: MutationKind,
    #[source]
    pub source: FetchError,
}

impl MutationError {
    pub fn new(kind: MutationKind, source: FetchError) -> Self {
        Self { kind, source }
    }

    pub fn message(&self) -> &str {
        self.source.message()
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment could not be deserialized
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    /// API base URL is not an absolute http(s) URL
    #[error("Invalid API base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

//! Error types for the iFarm admin client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire client.
///
/// Variants mirror how failures are classified at the HTTP boundary
/// (network, timeout, permission, validation, business, server) plus the
/// purely local failure modes (precondition guards, storage, configuration).
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum IfarmError {
    /// No response reached the client (connectivity failure).
    #[error("Network error: {0}")]
    Network(String),

    /// The per-request deadline elapsed before a response arrived.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// 401/403-class failure: missing, expired, or insufficient credentials.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// 400-class failure: the server rejected the request parameters.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Structured server-side rule violation carried in the response envelope.
    #[error("Business error [{code}]: {message}")]
    Business { code: i64, message: String },

    /// 5xx-class failure.
    #[error("Server error: {0}")]
    Server(String),

    /// A local precondition guard rejected the operation before any call was made.
    #[error("{0}")]
    Precondition(String),

    /// Durable credential storage failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The request could not be built or the client is misconfigured.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Anything else (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IfarmError {
    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Creates a Permission error.
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Business error from an envelope code and message.
    pub fn business(code: i64, message: impl Into<String>) -> Self {
        Self::Business {
            code,
            message: message.into(),
        }
    }

    /// Creates a Server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    /// Creates a Precondition (guard rejection) error.
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition(reason.into())
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Permission error.
    pub fn is_permission(&self) -> bool {
        matches!(self, Self::Permission(_))
    }

    /// Check if this is a Business error.
    pub fn is_business(&self) -> bool {
        matches!(self, Self::Business { .. })
    }

    /// Check if this is a Precondition (guard) rejection.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// Check if this failure never reached the server (network/timeout/config).
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::Config(_) | Self::Precondition(_)
        )
    }

    /// The user-facing message carried by this error.
    ///
    /// Server-originated kinds return the bare carried message so notices
    /// composed from them stay in one register; everything else falls back
    /// to the Display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Business { message, .. } => message.clone(),
            Self::Permission(message) | Self::Validation(message) | Self::Server(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for IfarmError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for IfarmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, IfarmError>`.
pub type Result<T> = std::result::Result<T, IfarmError>;

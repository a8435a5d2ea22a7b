//! Error types for typeauth
//!
//! This module defines the crate-level error hierarchy. Configuration and
//! verification plumbing return `Result<T, Error>`; the public
//! [`Authenticator::authenticate`](crate::auth::Authenticator::authenticate)
//! call folds these into an [`AuthError`](crate::types::AuthError) instead of
//! returning them.

use crate::types::AuthErrorKind;
use thiserror::Error;

/// The main error type for typeauth
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Verification Errors
    // ============================================================================
    /// A single attempt failed before any HTTP response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed after multiple retries")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error! status: {status}")]
    ServiceRejection { status: u16 },

    #[error("Failed to decode verification response: {message}")]
    Decode { message: String },

    #[error("unexpected error")]
    Unexpected,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Only transport-level failures are. A status code from the
    /// verification service is an answer, not a fault.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Classify this error for the public `AuthError`
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Error::Http(_) | Error::RetriesExhausted { .. } => AuthErrorKind::TransportFailure,
            Error::ServiceRejection { .. } => AuthErrorKind::ServiceRejection,
            Error::Decode { .. } => AuthErrorKind::InvalidVerdict,
            _ => AuthErrorKind::Unexpected,
        }
    }
}

/// Result type alias for typeauth
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for aqstat.
//!
//! Uses `thiserror` for structured error types. Every fetch-level variant
//! maps onto exactly one [`ReasonCode`], so provider failures arrive at the
//! result classifier already categorized. The `Other` passthrough exists
//! for unstructured errors from runtime layers; those fall back to message
//! pattern-matching in the classifier.

use thiserror::Error;

use crate::core::models::ReasonCode;

/// Main error type for aqstat operations.
#[derive(Error, Debug)]
pub enum AqError {
    // ==========================================================================
    // Credential errors
    // ==========================================================================
    /// No local credentials found for the provider.
    #[error("no credentials found for {provider}")]
    NoCredentials { provider: String },

    /// Stored token has expired and cannot be refreshed.
    #[error("token expired for {provider}")]
    TokenExpired { provider: String },

    /// The vendor rejected our credentials (HTTP 401/403).
    #[error("authentication failed for {provider}: {message}")]
    AuthFailed { provider: String, message: String },

    // ==========================================================================
    // Transport errors
    // ==========================================================================
    /// Network-level failure (DNS, connect, TLS, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    // ==========================================================================
    // Response errors
    // ==========================================================================
    /// Response body could not be parsed.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The endpoint no longer exists where we expect it (HTTP 404/410).
    #[error("endpoint changed for {provider}: HTTP {status}")]
    EndpointChanged { provider: String, status: u16 },

    /// Any other non-success response from the vendor API. The message
    /// already carries the HTTP status when one was received.
    #[error("API error: {message}")]
    Api { status: Option<u16>, message: String },

    // ==========================================================================
    // Configuration errors (CLI-level, never reach a provider result)
    // ==========================================================================
    /// Configuration file or value problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unrecognized provider name.
    #[error("invalid provider: {0}")]
    InvalidProvider(String),

    // ==========================================================================
    // Passthrough
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for unstructured errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AqError {
    /// The reason code this error carries, when it is structured.
    ///
    /// `None` means the error arrived unstructured (`Other`) and the
    /// caller should fall back to message classification.
    #[must_use]
    pub const fn reason_code(&self) -> Option<ReasonCode> {
        match self {
            Self::NoCredentials { .. } => Some(ReasonCode::NoCredentials),
            Self::TokenExpired { .. } => Some(ReasonCode::TokenExpired),
            Self::AuthFailed { .. } => Some(ReasonCode::AuthFailed),
            Self::Network(_) => Some(ReasonCode::NetworkError),
            Self::Timeout { .. } => Some(ReasonCode::Timeout),
            Self::Parse(_) | Self::Json(_) => Some(ReasonCode::ParseError),
            Self::EndpointChanged { .. } => Some(ReasonCode::EndpointChanged),
            Self::Api { .. } => Some(ReasonCode::ApiError),
            Self::Config(_) | Self::InvalidProvider(_) | Self::Io(_) => Some(ReasonCode::Unknown),
            Self::Other(_) => None,
        }
    }

    /// Build the right structured error for a non-success HTTP status.
    #[must_use]
    pub fn from_http_status(provider: &str, status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::AuthFailed {
                provider: provider.to_string(),
                message: format!("HTTP {status}"),
            },
            404 | 410 => Self::EndpointChanged {
                provider: provider.to_string(),
                status,
            },
            _ => Self::Api {
                status: Some(status),
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
            },
        }
    }
}

/// Result type alias for aqstat operations.
pub type Result<T> = std::result::Result<T, AqError>;

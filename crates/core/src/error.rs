//! Error types for the chatrelay domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all chatrelay operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid caller input (e.g. empty message). Maps to HTTP 400.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid configuration, detected before any network work.
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures from the outbound model gateway.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// The request never completed within the per-call deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("Network error: {0}")]
    Network(String),

    /// No credential configured; checked before any network attempt.
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

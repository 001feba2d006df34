//! Unified error types for the storefront workspace.
//!
//! [`StorefrontError`] is what library code propagates internally.
//! [`ApiError`] is the normalized `{code, message}` pair every call site
//! receives; internal errors collapse into it at the dispatcher boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when the backend envelope carries no message of its own.
pub const DEFAULT_ENVELOPE_MESSAGE: &str = "An error occurred";
/// Message used for 403 responses without a server-supplied message.
pub const DEFAULT_FORBIDDEN_MESSAGE: &str = "Access denied";
/// Message used for transport failures and unclassified HTTP errors.
pub const DEFAULT_NETWORK_MESSAGE: &str = "Network error occurred";
/// Message handed to callers whose session could not be recovered.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Enumerates all error kinds that can occur across storefront crates.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Credential or session failure that is not an HTTP status.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The session ended (refresh failed or no refresh token); the user must sign in again.
    #[error("session expired")]
    SessionExpired,

    /// HTTP transport error (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persistent storage (`SQLite`) error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend rejected the call with a normalized code and message.
    #[error(transparent)]
    Api(#[from] ApiError),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for StorefrontError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for StorefrontError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// The normalized failure outcome handed to every call site.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (code {code})")]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

impl ApiError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The rejection delivered when a session cannot be recovered.
    #[must_use]
    pub fn session_expired() -> Self {
        Self::new(401, SESSION_EXPIRED_MESSAGE)
    }

    /// A transport-level failure with the `500` fallback code.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }
}

impl From<StorefrontError> for ApiError {
    fn from(e: StorefrontError) -> Self {
        match e {
            StorefrontError::Api(api) => api,
            StorefrontError::SessionExpired => Self::session_expired(),
            StorefrontError::Auth(msg) => Self::new(401, msg),
            StorefrontError::Http(_) => Self::transport(DEFAULT_NETWORK_MESSAGE),
            other => Self::transport(other.to_string()),
        }
    }
}

/// Result type returned to call sites: `Ok(data)` or `Err({code, message})`.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

//! Async traits shared across all storefront crates.
//!
//! Every cross-crate abstraction is defined here so that higher layers depend
//! only on `storefront-types`, not on each other.

use crate::{RefreshedToken, StorageKey, StorefrontError};
use async_trait::async_trait;
use secrecy::SecretString;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Durable key-value storage for session state.
///
/// Each `get` / `set` / `remove` is atomic for its key; no operation spans keys.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: StorageKey) -> Result<Option<String>>;
    /// Write (or overwrite) the value stored under `key`.
    async fn set(&self, key: StorageKey, value: &str) -> Result<()>;
    /// Erase `key`; erasing an absent key is not an error.
    async fn remove(&self, key: StorageKey) -> Result<()>;

    /// Erase every session key.
    async fn clear(&self) -> Result<()> {
        for key in StorageKey::ALL {
            self.remove(key).await?;
        }
        Ok(())
    }
}

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Call the refresh endpoint once. Any error is treated as fatal for the session.
    async fn refresh(&self, refresh_token: &SecretString) -> Result<RefreshedToken>;
}

/// Receives session lifecycle notifications (the storefront navigates on these).
pub trait SessionListener: Send + Sync {
    /// The session ended and the user must sign in again at `login_path`.
    fn session_ended(&self, login_path: &str);
}

/// A [`SessionListener`] that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSessionListener;

impl SessionListener for LogSessionListener {
    fn session_ended(&self, login_path: &str) {
        tracing::warn!(redirect = login_path, "session ended, sign-in required");
    }
}

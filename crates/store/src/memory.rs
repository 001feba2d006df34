//! In-memory credential store backed by a `HashMap` behind a `Mutex`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use storefront_types::{CredentialStore, StorageKey, StorefrontError, traits::Result};

/// An in-memory [`CredentialStore`] implementation for testing and ephemeral use.
pub struct InMemoryCredentialStore {
    data: Mutex<HashMap<StorageKey, String>>,
}

impl InMemoryCredentialStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a store pre-populated with the given entries.
    #[must_use]
    pub fn with_entries<I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (StorageKey, V)>,
        V: Into<String>,
    {
        let data = entries.into_iter().map(|(k, v)| (k, v.into())).collect();
        Self {
            data: Mutex::new(data),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<StorageKey, String>>> {
        self.data
            .lock()
            .map_err(|_| StorefrontError::Storage("credential map poisoned".into()))
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.lock()?.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.lock()?.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<()> {
        self.lock()?.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryCredentialStore::new();
        store.set(StorageKey::AccessToken, "tok").await.unwrap();
        assert_eq!(
            store.get(StorageKey::AccessToken).await.unwrap().as_deref(),
            Some("tok")
        );
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryCredentialStore::new();
        assert!(store.get(StorageKey::RefreshToken).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = InMemoryCredentialStore::new();
        store.set(StorageKey::AccessToken, "first").await.unwrap();
        store.set(StorageKey::AccessToken, "second").await.unwrap();
        assert_eq!(
            store.get(StorageKey::AccessToken).await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn test_remove_absent_is_ok() {
        let store = InMemoryCredentialStore::new();
        store.remove(StorageKey::User).await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_removes_every_key() {
        let store = InMemoryCredentialStore::with_entries([
            (StorageKey::AccessToken, "a"),
            (StorageKey::RefreshToken, "r"),
            (StorageKey::User, "{}"),
        ]);
        store.clear().await.unwrap();
        for key in StorageKey::ALL {
            assert!(store.get(key).await.unwrap().is_none(), "{key} survived");
        }
    }
}

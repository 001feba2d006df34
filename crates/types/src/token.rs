//! Credential pair and the persisted key names.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Keys under which session state is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AccessToken,
    RefreshToken,
    /// JSON-encoded [`crate::User`].
    User,
}

impl StorageKey {
    /// Every key, in the order they are cleared on logout.
    pub const ALL: [Self; 3] = [Self::AccessToken, Self::RefreshToken, Self::User];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access and refresh token issued at sign-in.
pub struct Credentials {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of a successful call to the refresh endpoint.
pub struct RefreshedToken {
    pub access_token: SecretString,
    /// Present only when the backend rotates refresh tokens.
    pub refresh_token: Option<SecretString>,
}

impl RefreshedToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: None,
        }
    }

    #[must_use]
    pub fn with_refresh(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(SecretString::from(refresh_token.into()));
        self
    }

    /// Borrow the raw access token for header construction.
    #[must_use]
    pub fn access(&self) -> &str {
        self.access_token.expose_secret()
    }
}

impl fmt::Debug for RefreshedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshedToken")
            .field("access_token", &"[REDACTED]")
            .field("rotated", &self.refresh_token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_match_wire_names() {
        assert_eq!(StorageKey::AccessToken.as_str(), "accessToken");
        assert_eq!(StorageKey::RefreshToken.as_str(), "refreshToken");
        assert_eq!(StorageKey::User.as_str(), "user");
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let creds = Credentials::new("secret-access", "secret-refresh");
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("secret-access"));
        assert!(!dbg.contains("secret-refresh"));

        let refreshed = RefreshedToken::new("tok-xyz").with_refresh("ref-xyz");
        let dbg = format!("{refreshed:?}");
        assert!(!dbg.contains("tok-xyz"));
        assert!(!dbg.contains("ref-xyz"));
        assert!(dbg.contains("rotated: true"));
    }

    #[test]
    fn test_refreshed_access() {
        assert_eq!(RefreshedToken::new("abc").access(), "abc");
    }
}

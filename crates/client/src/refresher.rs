//! The refresh-endpoint call used by the [`RefreshCoordinator`](storefront_auth::RefreshCoordinator).

use async_trait::async_trait;
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::{Value, json};
use storefront_types::{RefreshedToken, StorefrontError, TokenRefresher, traits::Result};

use crate::{
    RequestOptions,
    envelope::{Normalized, normalize},
    http_util::ApiHttp,
};

/// POSTs `{refreshToken}` to the refresh endpoint, without an `Authorization` header.
pub struct HttpTokenRefresher {
    http: ApiHttp,
    path: String,
}

impl HttpTokenRefresher {
    #[must_use]
    pub fn new(http: ApiHttp, path: impl Into<String>) -> Self {
        Self {
            http,
            path: path.into(),
        }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &SecretString) -> Result<RefreshedToken> {
        let opts = RequestOptions::post(self.path.as_str())
            .json(json!({ "refreshToken": refresh_token.expose_secret() }));
        let raw = self.http.send(&opts, None).await?;
        tracing::debug!(status = raw.status, "refresh endpoint responded");

        match normalize(raw.status, raw.body.as_ref()) {
            Normalized::Success(data) => parse_refreshed(&data),
            Normalized::Failure(err) => Err(StorefrontError::Api(err)),
            Normalized::Unauthenticated => Err(StorefrontError::SessionExpired),
        }
    }
}

/// Extracts the new tokens from the envelope's `data`.
///
/// The access token is read from `data.data.accessToken` first, then
/// `data.accessToken`. A rotated `refreshToken` is taken from the same object.
fn parse_refreshed(data: &Value) -> Result<RefreshedToken> {
    let holder = [data.get("data"), Some(data)]
        .into_iter()
        .flatten()
        .find(|v| non_empty_str(v, "accessToken").is_some())
        .ok_or_else(|| StorefrontError::Auth("refresh response carried no access token".into()))?;

    let mut refreshed = RefreshedToken::new(non_empty_str(holder, "accessToken").unwrap_or_default());
    if let Some(rotated) = non_empty_str(holder, "refreshToken") {
        refreshed = refreshed.with_refresh(rotated);
    }
    Ok(refreshed)
}

fn non_empty_str<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    v.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret as _;

    #[test]
    fn test_parse_flat_data() {
        let r = parse_refreshed(&json!({"accessToken": "A2"})).unwrap();
        assert_eq!(r.access(), "A2");
        assert!(r.refresh_token.is_none());
    }

    #[test]
    fn test_parse_nested_data_wins() {
        let r = parse_refreshed(&json!({
            "accessToken": "outer",
            "data": {"accessToken": "inner", "refreshToken": "R2"}
        }))
        .unwrap();
        assert_eq!(r.access(), "inner");
        assert_eq!(
            r.refresh_token.as_ref().map(|t| t.expose_secret().to_string()),
            Some("R2".to_string())
        );
    }

    #[test]
    fn test_parse_missing_token() {
        assert!(matches!(
            parse_refreshed(&json!({"accessToken": ""})),
            Err(StorefrontError::Auth(_))
        ));
        assert!(parse_refreshed(&Value::Null).is_err());
    }
}

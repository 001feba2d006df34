//! Shared HTTP plumbing for the dispatcher and the token refresher.
//!
//! Transport only: sends a request, reads the body, and hands back the status
//! and parsed JSON. Classification happens in [`crate::envelope`].

use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::Value;
use std::time::Duration;
use storefront_types::traits::Result;

use crate::RequestOptions;

/// Status and decoded body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// Parsed JSON body; a non-JSON body is kept as a string, an empty one is `None`.
    pub body: Option<Value>,
}

/// Thin wrapper over a [`reqwest::Client`] bound to one backend origin.
#[derive(Clone)]
pub struct ApiHttp {
    http: Client,
    base_url: String,
}

impl ApiHttp {
    /// Builds a client that sends `Accept: application/json` and gives up
    /// after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error if the TLS backend cannot be initialised.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a request path against the base URL; absolute URLs pass through.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Performs one HTTP exchange, attaching `bearer` as the `Authorization` header.
    ///
    /// Any status is returned as-is; only transport failures are errors.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error on connect failure, timeout, or body read failure.
    pub async fn send(&self, opts: &RequestOptions, bearer: Option<&str>) -> Result<RawResponse> {
        let mut builder = self.http.request(opts.method.clone(), self.url(&opts.url));
        if !opts.params.is_empty() {
            builder = builder.query(&opts.params);
        }
        if let Some(data) = &opts.data {
            builder = builder.json(data);
        }
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;
        Ok(RawResponse {
            status,
            body: decode_body(&bytes),
        })
    }
}

fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(bytes)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
}

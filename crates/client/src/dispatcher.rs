//! Authenticated request execution.
//!
//! Every call goes through [`Dispatcher::request`]: attach the stored access
//! token, send, normalize the outcome, and on a 401 let the
//! [`RefreshCoordinator`] recover the session before retrying exactly once.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use storefront_auth::RefreshCoordinator;
use storefront_types::{ApiError, ApiResult};

use crate::{
    RequestOptions,
    envelope::{Normalized, normalize, unauthorized},
    http_util::{ApiHttp, RawResponse},
};

/// Sends requests on behalf of every storefront call site.
pub struct Dispatcher {
    http: ApiHttp,
    coordinator: Arc<RefreshCoordinator>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(http: ApiHttp, coordinator: Arc<RefreshCoordinator>) -> Self {
        Self { http, coordinator }
    }

    /// The coordinator owning this dispatcher's session.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    #[must_use]
    pub fn http(&self) -> &ApiHttp {
        &self.http
    }

    /// Executes `opts` and returns the envelope's `data` on success.
    ///
    /// A 401 triggers at most one refresh and one retry; the retry's outcome
    /// is returned as-is, even if it is another 401.
    ///
    /// # Errors
    ///
    /// Returns the normalized `{code, message}` for every failure: envelope
    /// errors, HTTP errors, transport errors, and unrecoverable sessions.
    pub async fn request(&self, opts: RequestOptions) -> ApiResult<Value> {
        let token = self.coordinator.access_token().await?;
        let first = self.exchange(&opts, token.as_deref()).await?;

        match normalize(first.status, first.body.as_ref()) {
            Normalized::Success(data) => Ok(data),
            Normalized::Failure(err) => Err(rejected(&opts, err)),
            Normalized::Unauthenticated => {
                tracing::debug!(
                    method = %opts.method,
                    path = opts.path(),
                    "401 received, handing over to refresh coordinator"
                );
                let fresh = self
                    .coordinator
                    .on_unauthorized(
                        opts.path(),
                        token.as_deref(),
                        unauthorized(first.body.as_ref()),
                    )
                    .await
                    .map_err(|err| rejected(&opts, err))?;
                let retry = self.exchange(&opts, Some(&fresh)).await?;
                normalize(retry.status, retry.body.as_ref())
                    .into_final(retry.body.as_ref())
                    .map_err(|err| rejected(&opts, err))
            }
        }
    }

    /// Like [`request`](Self::request), decoding `data` into `T`.
    ///
    /// # Errors
    ///
    /// Returns the request's failure, or `{500, …}` when `data` does not
    /// match `T`.
    pub async fn send<T: DeserializeOwned>(&self, opts: RequestOptions) -> ApiResult<T> {
        let path = opts.path().to_string();
        let data = self.request(opts).await?;
        serde_json::from_value(data).map_err(|e| {
            tracing::warn!(path = %path, error = %e, "unexpected response data shape");
            ApiError::transport(format!("unexpected response from {path}: {e}"))
        })
    }

    /// Like [`request`](Self::request), discarding `data`.
    ///
    /// # Errors
    ///
    /// Returns the request's failure.
    pub async fn send_unit(&self, opts: RequestOptions) -> ApiResult<()> {
        self.request(opts).await.map(drop)
    }

    async fn exchange(&self, opts: &RequestOptions, token: Option<&str>) -> ApiResult<RawResponse> {
        let raw = self.http.send(opts, token).await.map_err(|e| {
            tracing::warn!(method = %opts.method, path = opts.path(), error = %e, "request failed");
            ApiError::from(e)
        })?;
        tracing::debug!(
            method = %opts.method,
            path = opts.path(),
            status = raw.status,
            "response received"
        );
        Ok(raw)
    }
}

fn rejected(opts: &RequestOptions, err: ApiError) -> ApiError {
    tracing::debug!(
        method = %opts.method,
        path = opts.path(),
        code = err.code,
        message = %err.message,
        "request rejected"
    );
    err
}

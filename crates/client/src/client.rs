//! Wires configuration, storage, and the refresh coordinator into one client.

use serde_json::Value;
use std::sync::Arc;
use storefront_auth::RefreshCoordinator;
use storefront_config::Config;
use storefront_types::{
    ApiResult, CredentialStore, LogSessionListener, SessionListener, traits::Result,
};

use crate::{
    Dispatcher, HttpTokenRefresher, RequestOptions,
    api::{AuthApi, CartApi, CategoryApi, CustomerApi, ProductApi},
    http_util::ApiHttp,
};

/// Entry point for storefront call sites.
pub struct StorefrontClient {
    dispatcher: Dispatcher,
}

impl StorefrontClient {
    /// Builds a client from `config`, persisting the session in `store`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid settings, or an HTTP error
    /// if the client cannot be constructed.
    pub fn from_config(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::with_listener(config, store, Arc::new(LogSessionListener))
    }

    /// Like [`from_config`](Self::from_config), notifying `listener` when the
    /// session ends.
    ///
    /// # Errors
    ///
    /// See [`from_config`](Self::from_config).
    pub fn with_listener(
        config: &Config,
        store: Arc<dyn CredentialStore>,
        listener: Arc<dyn SessionListener>,
    ) -> Result<Self> {
        config.validate()?;
        let http = ApiHttp::new(&config.base_url, config.timeout())?;
        let refresher = Arc::new(HttpTokenRefresher::new(http.clone(), &config.refresh_path));
        let coordinator = RefreshCoordinator::new(store, refresher)
            .with_listener(listener)
            .with_refresh_path(&config.refresh_path)
            .with_login_path(&config.login_path);
        tracing::debug!(base_url = %config.base_url, "storefront client ready");
        Ok(Self {
            dispatcher: Dispatcher::new(http, Arc::new(coordinator)),
        })
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Sends an arbitrary request through the authenticated pipeline.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn request(&self, opts: RequestOptions) -> ApiResult<Value> {
        self.dispatcher.request(opts).await
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.dispatcher)
    }

    #[must_use]
    pub fn cart(&self) -> CartApi<'_> {
        CartApi::new(&self.dispatcher)
    }

    #[must_use]
    pub fn categories(&self) -> CategoryApi<'_> {
        CategoryApi::new(&self.dispatcher)
    }

    #[must_use]
    pub fn customers(&self) -> CustomerApi<'_> {
        CustomerApi::new(&self.dispatcher)
    }

    #[must_use]
    pub fn products(&self) -> ProductApi<'_> {
        ProductApi::new(&self.dispatcher)
    }
}

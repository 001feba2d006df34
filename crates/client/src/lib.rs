//! Authenticated HTTP client for the storefront backend.
//!
//! Requests flow through the [`Dispatcher`], which attaches the stored access
//! token, normalizes every outcome into `Result<Value, ApiError>`, and defers
//! 401s to the shared [`RefreshCoordinator`](storefront_auth::RefreshCoordinator).

pub mod api;
pub mod client;
pub mod dispatcher;
pub mod envelope;
pub mod http_util;
pub mod refresher;
pub mod request;

pub use client::StorefrontClient;
pub use dispatcher::Dispatcher;
pub use envelope::{Normalized, normalize, unauthorized};
pub use http_util::{ApiHttp, RawResponse};
pub use refresher::HttpTokenRefresher;
pub use request::RequestOptions;
pub use reqwest::Method;

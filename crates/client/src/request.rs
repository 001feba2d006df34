//! Request descriptions handed to the [`Dispatcher`](crate::Dispatcher).

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use storefront_types::traits::Result;

/// One backend call: method, path (or absolute URL), optional JSON body and
/// query parameters.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub url: String,
    pub data: Option<Value>,
    pub params: Vec<(String, String)>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            data: None,
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    #[must_use]
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    #[must_use]
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attaches a raw JSON body.
    #[must_use]
    pub fn json(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serializes `payload` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `payload` cannot be represented as JSON.
    pub fn body<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self> {
        Ok(self.json(serde_json::to_value(payload)?))
    }

    /// Appends one query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Path portion of the target, without query string or origin.
    #[must_use]
    pub fn path(&self) -> &str {
        let rest = match self.url.split_once("://") {
            Some((_, after_scheme)) => after_scheme
                .find('/')
                .map_or("/", |i| &after_scheme[i..]),
            None => self.url.as_str(),
        };
        rest.split('?').next().unwrap_or(rest)
    }
}

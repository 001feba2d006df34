use storefront_types::{ApiResult, Category, CategoryPayload};

use crate::{Dispatcher, RequestOptions};

const CATEGORIES: &str = "/api/categories";

pub struct CategoryApi<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> CategoryApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        self.dispatcher.send(RequestOptions::get(CATEGORIES)).await
    }

    /// Admin only.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure (`403` for non-admins).
    pub async fn create(&self, payload: &CategoryPayload) -> ApiResult<()> {
        let opts = RequestOptions::post(CATEGORIES).body(payload)?;
        self.dispatcher.send_unit(opts).await
    }

    /// Admin only.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn update(&self, id: &str, payload: &CategoryPayload) -> ApiResult<()> {
        let opts = RequestOptions::put(format!("{CATEGORIES}/{id}")).body(payload)?;
        self.dispatcher.send_unit(opts).await
    }

    /// Admin only.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.dispatcher
            .send_unit(RequestOptions::delete(format!("{CATEGORIES}/{id}")))
            .await
    }
}

use storefront_types::{ApiResult, Customer, Page, UpdateStatusPayload};

use crate::{Dispatcher, RequestOptions};

const USERS: &str = "/api/users";

/// Admin management of customer accounts.
pub struct CustomerApi<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> CustomerApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// One page of customers; `page` is zero-based.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn list(&self, page: u32, size: u32) -> ApiResult<Page<Customer>> {
        let opts = RequestOptions::get(USERS)
            .param("page", page)
            .param("size", size);
        let listing: Page<Customer> = self.dispatcher.send(opts).await?;
        Ok(listing.or_page(page))
    }

    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.dispatcher
            .send_unit(RequestOptions::delete(format!("{USERS}/{id}")))
            .await
    }

    /// Activates or deactivates an account.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn update_status(&self, id: &str, active: bool) -> ApiResult<()> {
        let opts = RequestOptions::patch(format!("{USERS}/{id}/status"))
            .body(&UpdateStatusPayload { is_active: active })?;
        self.dispatcher.send_unit(opts).await
    }
}

use storefront_types::{ApiResult, CartItem, CartItemPayload};

use crate::{Dispatcher, RequestOptions};

const CART: &str = "/customer/api/cart";

/// The signed-in customer's cart.
pub struct CartApi<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> CartApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn items(&self) -> ApiResult<Vec<CartItem>> {
        self.dispatcher.send(RequestOptions::get(CART)).await
    }

    /// Number of items in the cart.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn count(&self) -> ApiResult<u32> {
        self.dispatcher
            .send(RequestOptions::get(format!("{CART}/count")))
            .await
    }

    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn add(&self, item: &CartItemPayload) -> ApiResult<()> {
        let opts = RequestOptions::post(format!("{CART}/add")).body(item)?;
        self.dispatcher.send_unit(opts).await
    }

    /// Sets the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn update_quantity(&self, item: &CartItemPayload) -> ApiResult<()> {
        let opts = RequestOptions::patch(format!("{CART}/update-quantity")).body(item)?;
        self.dispatcher.send_unit(opts).await
    }

    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn checkout(&self) -> ApiResult<()> {
        self.dispatcher
            .send_unit(RequestOptions::post(format!("{CART}/checkout")))
            .await
    }
}

use storefront_types::{ApiResult, Page, Product, ProductRating, RatingPayload};

use crate::{Dispatcher, RequestOptions};

const PRODUCTS: &str = "/api/products";

pub struct ProductApi<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> ProductApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// One page of the catalogue; `page` is zero-based.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn list(&self, page: u32, size: u32) -> ApiResult<Page<Product>> {
        self.page(RequestOptions::get(PRODUCTS), page, size).await
    }

    /// One page of the products in category `category_id`.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn by_category(
        &self,
        category_id: &str,
        page: u32,
        size: u32,
    ) -> ApiResult<Page<Product>> {
        let opts = RequestOptions::get(PRODUCTS).param("categoryId", category_id);
        self.page(opts, page, size).await
    }

    /// # Errors
    ///
    /// Returns the normalized request failure (`404` for unknown ids).
    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        self.dispatcher
            .send(RequestOptions::get(format!("{PRODUCTS}/{id}")))
            .await
    }

    /// Admin only.
    ///
    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.dispatcher
            .send_unit(RequestOptions::delete(format!("{PRODUCTS}/{id}")))
            .await
    }

    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn ratings(&self, id: &str) -> ApiResult<Vec<ProductRating>> {
        self.dispatcher
            .send(RequestOptions::get(format!("{PRODUCTS}/{id}/ratings")))
            .await
    }

    /// # Errors
    ///
    /// Returns the normalized request failure.
    pub async fn add_rating(&self, id: &str, payload: &RatingPayload) -> ApiResult<()> {
        let opts = RequestOptions::post(format!("{PRODUCTS}/{id}/ratings")).body(payload)?;
        self.dispatcher.send_unit(opts).await
    }

    async fn page(&self, opts: RequestOptions, page: u32, size: u32) -> ApiResult<Page<Product>> {
        let opts = opts.param("page", page).param("size", size);
        let listing: Page<Product> = self.dispatcher.send(opts).await?;
        Ok(listing.or_page(page))
    }
}

//! Typed wrappers over the storefront backend endpoints.
//!
//! Each API borrows the [`Dispatcher`](crate::Dispatcher), so every call
//! shares its session handling and error normalization.

mod auth;
mod cart;
mod category;
mod customer;
mod product;

pub use auth::AuthApi;
pub use cart::CartApi;
pub use category::CategoryApi;
pub use customer::CustomerApi;
pub use product::ProductApi;

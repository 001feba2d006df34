//! Core types and traits for the storefront workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! storefront client: error types, the backend response envelope, credential
//! representations, domain payloads, and the async traits each layer implements.

pub mod envelope;
pub mod error;
pub mod model;
pub mod token;
pub mod traits;

pub use envelope::Envelope;
pub use error::{ApiError, ApiResult, StorefrontError};
pub use model::{
    CartItem, CartItemPayload, Category, CategoryPayload, CategoryRef, Customer, Page, Product,
    ProductRating, RatingPayload, Role, SignInPayload, SignInResponse, SignUpPayload,
    UpdateStatusPayload, User,
};
pub use token::{Credentials, RefreshedToken, StorageKey};
pub use traits::{CredentialStore, LogSessionListener, SessionListener, TokenRefresher};

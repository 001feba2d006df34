//! Storefront domain payloads exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The signed-in user, persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Where the storefront lands this user after sign-in.
    #[must_use]
    pub fn home_path(&self) -> &'static str {
        if self.is_admin() { "/admin" } else { "/" }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub phone_number: String,
}

/// `data` of a successful `/auth/sign-in`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Admin view of a customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of both category create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRating {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingPayload {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub product_name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Body of both cart add and quantity update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemPayload {
    pub product_id: String,
    pub quantity: u32,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub current_page: Option<u32>,
}

impl<T> Page<T> {
    /// Fill in `current_page` with the requested page when the backend omits it.
    #[must_use]
    pub fn or_page(mut self, requested: u32) -> Self {
        self.current_page.get_or_insert(requested);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_camel_case() {
        let user: User = serde_json::from_value(json!({
            "email": "a@b.c",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "role": "admin"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.home_path(), "/admin");
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["firstName"], "Ada");
    }

    #[test]
    fn test_customer_home_path() {
        let user = User {
            email: "c@d.e".into(),
            first_name: "C".into(),
            last_name: "D".into(),
            role: Role::Customer,
        };
        assert_eq!(user.home_path(), "/");
    }

    #[test]
    fn test_sign_up_payload_shape() {
        let p = SignUpPayload {
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.c".into(),
            password: "pw".into(),
            address: "1 Main St".into(),
            phone_number: "555".into(),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["phoneNumber"], "555");
        assert!(v.get("confirmPassword").is_none());
    }

    #[test]
    fn test_status_payload_shape() {
        let v = serde_json::to_value(UpdateStatusPayload { is_active: false }).unwrap();
        assert_eq!(v, json!({"isActive": false}));
    }

    #[test]
    fn test_page_current_page_fallback() {
        let page: Page<Customer> = serde_json::from_value(json!({
            "content": [],
            "totalPages": 3,
            "totalElements": 25
        }))
        .unwrap();
        assert_eq!(page.or_page(2).current_page, Some(2));

        let page: Page<Customer> = serde_json::from_value(json!({
            "content": [],
            "currentPage": 1
        }))
        .unwrap();
        assert_eq!(page.or_page(2).current_page, Some(1));
    }
}

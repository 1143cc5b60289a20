//! Authentication — login, signup, password flows, logout.
//!
//! ## Session model
//!
//! A successful login writes the [`Customer`] profile under `customer`, the
//! legacy convenience keys `customerId`, `customerName` and `Role`, and the
//! bearer token when the backend issued one. Logout clears all of them
//! together along with the in-memory cart and wishlist. The token is never
//! exposed through the public API.
//!
//! [`Customer`]: crate::session::Customer

pub mod client;

use serde::{Deserialize, Serialize};

use crate::session::Customer;
use crate::shared::CustomerId;

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /signup`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SignupRequest {
    /// A customer-role signup.
    pub fn customer(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: "customer".to_string(),
            phone: None,
            address: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GoogleLoginRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
}

// ============================================================================
// Responses
// ============================================================================

/// `POST /login` response: a flat profile plus a greeting.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub id: CustomerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "authToken")]
    pub token: Option<String>,
}

impl LoginResponse {
    pub fn customer(&self) -> Customer {
        Customer {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            address: None,
            phone: None,
        }
    }
}

/// `POST /auth/google` response.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleLoginResponse {
    pub customer: Customer,
    #[serde(default)]
    pub token: Option<String>,
}

/// `{ "message": ... }` acknowledgements.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

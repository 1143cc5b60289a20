//! Session storage — the persisted key/value state a storefront keeps
//! between runs.
//!
//! ## Model
//!
//! - [`SessionStore`] is the raw capability: string keys, string values,
//!   `get`/`set`/`remove`/`clear`. [`MemorySessionStore`] backs tests and
//!   short-lived processes; [`FileSessionStore`] persists to a JSON file.
//! - [`Session`] is the typed view the SDK reads: the signed-in
//!   [`Customer`] profile under `customer`, the bearer token under
//!   `authToken` (or the legacy `token`), and the legacy convenience keys
//!   `customerId`, `customerName` and `Role`, which are always written and
//!   cleared together.
//!
//! The token is never handed out through the public API; only the HTTP
//! layer reads it.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::error::{AuthError, SessionError};
use crate::shared::{serde_util, CustomerId};

pub const CUSTOMER_KEY: &str = "customer";
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const LEGACY_TOKEN_KEY: &str = "token";
pub const CUSTOMER_ID_KEY: &str = "customerId";
pub const CUSTOMER_NAME_KEY: &str = "customerName";
pub const ROLE_KEY: &str = "Role";

/// Every key owned by the signed-in identity.
pub const AUTH_KEYS: &[&str] = &[
    CUSTOMER_KEY,
    AUTH_TOKEN_KEY,
    LEGACY_TOKEN_KEY,
    CUSTOMER_ID_KEY,
    CUSTOMER_NAME_KEY,
    ROLE_KEY,
];

/// Durable string key/value storage.
///
/// Implementations must be cheap to call from async code; none of the SDK's
/// callers hold a lock across a store call.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

// ============================================================================
// Customer profile
// ============================================================================

/// The signed-in customer's profile, as persisted under `customer`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        default,
        deserialize_with = "serde_util::non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Customer {
    pub fn is_admin(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|role| role.eq_ignore_ascii_case("admin"))
    }
}

// ============================================================================
// Typed session view
// ============================================================================

/// Typed access to the persisted session keys.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// The signed-in customer, if a parsable profile is stored.
    ///
    /// Storage and parse failures are logged and read as "signed out".
    pub fn customer(&self) -> Option<Customer> {
        let raw = match self.store.get(CUSTOMER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read customer from session storage");
                return None;
            }
        };
        match serde_json::from_str::<Customer>(&raw) {
            Ok(customer) => Some(customer),
            Err(e) => {
                warn!(error = %e, "Failed to parse customer from session storage");
                None
            }
        }
    }

    /// The signed-in customer, or [`AuthError::NotAuthenticated`].
    pub fn require_customer(&self) -> Result<Customer, AuthError> {
        self.customer().ok_or(AuthError::NotAuthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.customer().is_some()
    }

    /// Bearer token: `authToken` first, then the legacy `token` key.
    pub(crate) fn token(&self) -> Option<String> {
        [AUTH_TOKEN_KEY, LEGACY_TOKEN_KEY]
            .iter()
            .find_map(|key| self.store.get(key).ok().flatten())
            .filter(|token| !token.is_empty())
    }

    /// Persist a freshly signed-in identity and its legacy convenience keys.
    pub(crate) fn persist_login(
        &self,
        customer: &Customer,
        token: Option<&str>,
    ) -> Result<(), SessionError> {
        let profile = serde_json::to_string(customer)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        self.store.set(CUSTOMER_KEY, &profile)?;
        self.store.set(CUSTOMER_ID_KEY, &customer.id.to_string())?;
        self.store.set(CUSTOMER_NAME_KEY, &customer.name)?;
        self.store
            .set(ROLE_KEY, customer.role.as_deref().unwrap_or("customer"))?;
        if let Some(token) = token {
            self.store.set(AUTH_TOKEN_KEY, token)?;
            self.store.set(LEGACY_TOKEN_KEY, token)?;
        }
        Ok(())
    }

    /// Drop every identity key. Failures are logged, never returned.
    pub fn clear_auth(&self) {
        for key in AUTH_KEYS {
            if let Err(e) = self.store.remove(key) {
                warn!(key, error = %e, "Failed to clear session key");
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

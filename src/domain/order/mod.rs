//! Order domain — created orders, order history, checkout.

pub mod checkout;
pub mod client;
pub mod convert;
pub mod wire;

pub use checkout::{CheckoutOutcome, PendingOrder};
pub use wire::{AddressData, OrderItem, PlaceOrderRequest};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::serde_util::{lenient_datetime, null_as_default};
use crate::shared::{CustomerId, OrderId};

// ─── Order ───────────────────────────────────────────────────────────────────

/// A server-owned order, normalized to a single shape whatever the
/// endpoint returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(
        default,
        alias = "order_date",
        deserialize_with = "lenient_datetime::deserialize"
    )]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
    /// Any other fields the server sent, kept for display.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Order {
    /// Number of units across all items.
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }
}

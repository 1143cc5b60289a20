//! Cart domain — lines, pure state transitions, sub-client.

pub mod client;
pub mod state;
pub mod wire;

pub use state::CartState;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::shared::ProductId;

/// One product in the cart. Unique by `product_id` within a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Server row id. `None` for a line that exists only optimistically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: None,
            product_id: product.id,
            product_name: product.name.clone(),
            price: product.price,
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

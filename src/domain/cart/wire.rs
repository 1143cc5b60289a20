//! Cart request bodies.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::shared::{CustomerId, ProductId};

/// Plain-text body `POST /cart/add` answers with on success. Anything else
/// is the server's reason for refusing.
pub const ADD_SUCCESS_SENTINEL: &str = "Item added to cart";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecrementRequest {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
}

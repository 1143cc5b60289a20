//! Order request bodies and line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::CartLine;
use crate::shared::{CustomerId, ProductId};

/// One product line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: None,
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// Structured shipping address entered at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressData {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

impl AddressData {
    /// Trimmed copy with blank fields as `None`.
    pub fn normalized(&self) -> Self {
        Self {
            street: non_blank(self.street.as_deref()),
            city: non_blank(self.city.as_deref()),
            state: non_blank(self.state.as_deref()),
            country: non_blank(self.country.as_deref()),
            pincode: non_blank(self.pincode.as_deref()),
        }
    }
}

/// What the caller asks `orders().place()` for. Every field is optional:
/// without `items` the live cart is ordered, without `amount` the total is
/// the items' subtotal, without `shipping_address` the customer profile's
/// address is used.
#[derive(Debug, Clone, Default)]
pub struct PlaceOrderRequest {
    pub shipping_address: Option<String>,
    pub location: Option<String>,
    pub address: Option<AddressData>,
    pub coupon_code: Option<String>,
    pub items: Option<Vec<OrderItem>>,
    pub amount: Option<Decimal>,
}

impl PlaceOrderRequest {
    /// Order exactly these items for exactly this amount (the checkout flow,
    /// where the amount was already paid).
    pub fn paid(items: Vec<OrderItem>, amount: Decimal) -> Self {
        Self {
            items: Some(items),
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: AddressData) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_coupon(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }
}

/// `POST /orders/create` body. Absent optional fields are sent as `null`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub total_amount: Decimal,
    pub items: Vec<OrderItem>,
    pub shipping_address: Option<String>,
    pub location: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub coupon_code: Option<String>,
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

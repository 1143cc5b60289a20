//! Payment domain — provider order handles for checkout.

pub mod client;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Provider order handle from `POST /payments/order`.
///
/// `amount` is in the currency's minor unit (paise for INR).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
    /// True when the backend has no payment provider configured and
    /// fabricated the handle.
    #[serde(default)]
    pub mock: bool,
}

impl PaymentOrder {
    /// `amount` converted back to major units.
    pub fn major_amount(&self) -> Decimal {
        Decimal::new(self.amount, 2)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentOrderRequest {
    pub amount: Decimal,
    pub currency: String,
    pub receipt: String,
}

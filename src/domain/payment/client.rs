//! Payments sub-client.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::client::StoreClient;
use crate::domain::payment::{PaymentOrder, PaymentOrderRequest};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::round_cents;

pub struct Payments<'a> {
    pub(crate) client: &'a StoreClient,
}

impl<'a> Payments<'a> {
    /// Request a provider order for `amount`, rounded to two places, with a
    /// fresh `<prefix>_<millis>` receipt.
    pub async fn create_order(&self, amount: Decimal) -> Result<PaymentOrder, SdkError> {
        if amount.is_sign_negative() {
            return Err(SdkError::InvalidArgument(
                "Amount must not be negative".to_string(),
            ));
        }
        let request = PaymentOrderRequest {
            amount: round_cents(amount),
            currency: self.client.currency.clone(),
            receipt: receipt(&self.client.receipt_prefix, Utc::now().timestamp_millis()),
        };
        Ok(self
            .client
            .http
            .post("/payments/order", &request, RetryPolicy::None)
            .await?)
    }
}

fn receipt(prefix: &str, millis: i64) -> String {
    format!("{prefix}_{millis}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_format() {
        assert_eq!(receipt("buygreen", 1_700_000_000_123), "buygreen_1700000000123");
    }

    #[test]
    fn test_payment_order_decodes_mock_handle() {
        let order: PaymentOrder = serde_json::from_str(
            r#"{"id":"5f0c","amount":129950,"currency":"INR","status":"mock","mock":true}"#,
        )
        .unwrap();
        assert!(order.mock);
        assert_eq!(order.major_amount(), Decimal::new(129950, 2));
    }
}

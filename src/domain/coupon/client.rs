//! Coupons sub-client.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::client::StoreClient;
use crate::domain::coupon::CouponValidation;
use crate::error::{HttpError, SdkError};
use crate::http::RetryPolicy;
use crate::shared::round_cents;

pub struct Coupons<'a> {
    pub(crate) client: &'a StoreClient,
}

/// The backend parses `orderTotal` itself, so it travels as a string.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateRequest<'r> {
    code: &'r str,
    order_total: String,
}

impl<'a> Coupons<'a> {
    /// Validate `code` against `order_total`.
    ///
    /// A refusal (400) is an `Ok` answer with `valid: false` and the
    /// server's reason; only transport and server faults are errors.
    pub async fn validate(
        &self,
        code: &str,
        order_total: Decimal,
    ) -> Result<CouponValidation, SdkError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(SdkError::InvalidArgument(
                "Coupon code is required".to_string(),
            ));
        }

        let request = ValidateRequest {
            code,
            order_total: round_cents(order_total).to_string(),
        };
        match self
            .client
            .http
            .post::<CouponValidation, _>("/coupons/validate", &request, RetryPolicy::None)
            .await
        {
            Ok(validation) => Ok(validation),
            Err(HttpError::BadRequest { message, .. }) => Ok(CouponValidation {
                valid: false,
                coupon: None,
                discount: None,
                final_amount: None,
                message: Some(message.unwrap_or_else(|| "Invalid coupon code".to_string())),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

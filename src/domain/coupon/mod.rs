//! Coupon domain — server-side validation and local application to a total.

pub mod client;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::round_cents;

/// Answer of `POST /coupons/validate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CouponValidation {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub coupon: Option<CouponSummary>,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub final_amount: Option<Decimal>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CouponValidation {
    /// The coupon to carry into checkout, if the code was accepted.
    pub fn applied(&self) -> Option<AppliedCoupon> {
        if !self.valid {
            return None;
        }
        let coupon = self.coupon.as_ref()?;
        Some(AppliedCoupon {
            code: coupon.code.clone(),
            discount_amount: self.discount.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CouponSummary {
    pub code: String,
    #[serde(default)]
    pub discount_type: Option<DiscountType>,
    #[serde(default)]
    pub discount_value: Option<Decimal>,
}

/// A coupon applied to the current checkout. Transient: only its code
/// reaches the server, with the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount_amount: Decimal,
}

impl AppliedCoupon {
    /// `total` minus the discount, never below zero.
    pub fn apply_to(&self, total: Decimal) -> Decimal {
        round_cents((total - self.discount_amount).max(Decimal::ZERO))
    }
}

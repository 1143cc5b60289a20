//! Review domain — product reviews and the caller's eligibility to write one.

pub mod client;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::serde_util::lenient_datetime;
use crate::shared::{CustomerId, ProductId};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: Option<i64>,
    pub product_id: ProductId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub customer_name: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime::deserialize")]
    pub review_date: Option<DateTime<Utc>>,
}

/// Whether the signed-in customer may review a product, and why not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEligibility {
    #[serde(default)]
    pub can_review: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ReviewEligibility {
    pub(crate) fn logged_out() -> Self {
        Self {
            can_review: false,
            reason: Some("Please log in to leave a review.".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewRequest {
    pub rating: u8,
    pub comment: String,
}

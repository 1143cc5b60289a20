//! Reviews sub-client.

use tracing::debug;

use crate::client::StoreClient;
use crate::domain::review::{Review, ReviewEligibility, ReviewRequest, MAX_RATING, MIN_RATING};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::ProductId;

pub struct Reviews<'a> {
    pub(crate) client: &'a StoreClient,
}

impl<'a> Reviews<'a> {
    pub async fn list(&self, product_id: ProductId) -> Result<Vec<Review>, SdkError> {
        let reviews: Option<Vec<Review>> = self
            .client
            .http
            .get(
                &format!("/products/{product_id}/reviews"),
                RetryPolicy::Idempotent,
            )
            .await?;
        Ok(reviews.unwrap_or_default())
    }

    /// Never fails: any error reads as "log in to review".
    pub async fn eligibility(&self, product_id: ProductId) -> ReviewEligibility {
        match self
            .client
            .http
            .get::<ReviewEligibility>(
                &format!("/products/{product_id}/reviews/check"),
                RetryPolicy::None,
            )
            .await
        {
            Ok(eligibility) => eligibility,
            Err(e) => {
                debug!(%product_id, error = %e, "Review eligibility check failed");
                ReviewEligibility::logged_out()
            }
        }
    }

    /// Post a review. The rating must be 1 to 5.
    pub async fn submit(
        &self,
        product_id: ProductId,
        rating: u8,
        comment: &str,
    ) -> Result<Review, SdkError> {
        self.client.session.require_customer()?;
        if rating == 0 {
            return Err(SdkError::InvalidArgument(
                "Please select a star rating.".to_string(),
            ));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(SdkError::InvalidArgument(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}."
            )));
        }

        let request = ReviewRequest {
            rating,
            comment: comment.trim().to_string(),
        };
        Ok(self
            .client
            .http
            .post(
                &format!("/products/{product_id}/reviews"),
                &request,
                RetryPolicy::None,
            )
            .await?)
    }
}

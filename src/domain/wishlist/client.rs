//! Wishlist sub-client. Each mutation is followed by an authoritative
//! `GET /wishlist`; failures carry the server's message as
//! [`SdkError::Rejected`].

use tracing::{error, warn};

use crate::client::{StoreClient, StoreEvent};
use crate::domain::wishlist::wire::{WishlistCheckResponse, WishlistRequest};
use crate::domain::wishlist::WishlistEntry;
use crate::error::{HttpError, SdkError};
use crate::http::RetryPolicy;
use crate::shared::ProductId;

pub struct Wishlist<'a> {
    pub(crate) client: &'a StoreClient,
}

impl<'a> Wishlist<'a> {
    /// Replace local state with the server's wishlist. Signed out empties it
    /// without a request.
    pub async fn fetch(&self) -> Result<Vec<WishlistEntry>, SdkError> {
        if !self.client.session.is_authenticated() {
            self.replace(Vec::new()).await;
            return Ok(Vec::new());
        }

        let entries: Option<Vec<WishlistEntry>> = self
            .client
            .http
            .get("/wishlist", RetryPolicy::Idempotent)
            .await?;
        let entries = entries.unwrap_or_default();
        self.replace(entries.clone()).await;
        Ok(entries)
    }

    /// Save a product. Returns the created entry when the server echoes one.
    pub async fn add(&self, product_id: ProductId) -> Result<Option<WishlistEntry>, SdkError> {
        self.preflight(product_id)?;

        let result = self
            .client
            .http
            .post::<serde_json::Value, _>(
                "/wishlist/add",
                &WishlistRequest { product_id },
                RetryPolicy::None,
            )
            .await
            .map_err(|e| rejected(e, "Failed to add to wishlist"));

        match result {
            Ok(body) => {
                self.refresh().await;
                Ok(serde_json::from_value(body).ok())
            }
            Err(e) => {
                error!(%product_id, error = %e, "Add to wishlist failed");
                Err(e)
            }
        }
    }

    pub async fn remove(&self, product_id: ProductId) -> Result<(), SdkError> {
        self.preflight(product_id)?;

        let result = self
            .client
            .http
            .post::<serde_json::Value, _>(
                "/wishlist/remove",
                &WishlistRequest { product_id },
                RetryPolicy::None,
            )
            .await
            .map_err(|e| rejected(e, "Failed to remove from wishlist"));

        match result {
            Ok(_) => {
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                error!(%product_id, error = %e, "Remove from wishlist failed");
                Err(e)
            }
        }
    }

    /// Ask the server whether the product is saved. Signed out is `false`.
    pub async fn check(&self, product_id: ProductId) -> Result<bool, SdkError> {
        if !self.client.session.is_authenticated() {
            return Ok(false);
        }
        let resp: WishlistCheckResponse = self
            .client
            .http
            .get(
                &format!("/wishlist/check/{product_id}"),
                RetryPolicy::Idempotent,
            )
            .await?;
        Ok(resp.in_wishlist)
    }

    pub async fn items(&self) -> Vec<WishlistEntry> {
        self.client.wishlist.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.client.wishlist.read().await.len()
    }

    /// Whether the product is in the local wishlist.
    pub async fn contains(&self, product_id: ProductId) -> bool {
        self.client
            .wishlist
            .read()
            .await
            .iter()
            .any(|e| e.product_id == product_id)
    }

    fn preflight(&self, product_id: ProductId) -> Result<(), SdkError> {
        self.client.session.require_customer()?;
        if !product_id.is_valid() {
            return Err(SdkError::InvalidArgument(
                "Product ID is required".to_string(),
            ));
        }
        Ok(())
    }

    async fn refresh(&self) {
        if let Err(e) = self.fetch().await {
            warn!(error = %e, "Wishlist refresh failed");
        }
    }

    pub(crate) async fn replace(&self, entries: Vec<WishlistEntry>) {
        *self.client.wishlist.write().await = entries.clone();
        self.client.notify(&StoreEvent::WishlistChanged(entries));
    }
}

fn rejected(e: HttpError, fallback: &str) -> SdkError {
    let message = match e.server_message() {
        Some(m) => m.to_string(),
        None if e.is_network() => e.to_string(),
        None => fallback.to_string(),
    };
    SdkError::Rejected(message)
}

//! Cart sub-client — optimistic add/decrement reconciled by refetch.
//!
//! Every mutation runs in three steps: apply the pure transition locally and
//! notify observers, send the request, then replace local state with
//! `GET /cart/{customerId}`. A second mutation for the same product while
//! one is outstanding is dropped before it touches state or the network.

use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use crate::client::{StoreClient, StoreEvent};
use crate::domain::cart::wire::{AddToCartRequest, DecrementRequest, ADD_SUCCESS_SENTINEL};
use crate::domain::cart::{CartLine, CartState};
use crate::domain::product::Product;
use crate::error::{AuthError, HttpError, SdkError};
use crate::http::client::plain_text;
use crate::http::RetryPolicy;
use crate::shared::ProductId;

pub struct Cart<'a> {
    pub(crate) client: &'a StoreClient,
}

impl<'a> Cart<'a> {
    /// Add `quantity` of `product` to the signed-in customer's cart.
    ///
    /// Fails with [`AuthError::NotAuthenticated`] before any state change or
    /// request when nobody is signed in.
    pub async fn add(&self, product: &Product, quantity: u32) -> Result<(), SdkError> {
        let customer = self.client.session.require_customer()?;
        if quantity == 0 {
            return Err(SdkError::InvalidArgument(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let key = format!("add-{}", product.id);
        let Some(_guard) = self.client.pending.try_acquire(key.as_str()) else {
            debug!(%key, "Add already in flight, skipping");
            return Ok(());
        };

        let snapshot = self.update(|cart| cart.with_added(product, quantity)).await;

        let request = AddToCartRequest {
            customer_id: customer.id,
            product_id: product.id,
            product_name: product.name.clone(),
            price: product.price,
            quantity,
        };
        let result = match self
            .client
            .http
            .post_text("/cart/add", &request, RetryPolicy::None)
            .await
        {
            Ok(body) => {
                let text = plain_text(&body);
                if text == ADD_SUCCESS_SENTINEL {
                    Ok(())
                } else {
                    Err(SdkError::Rejected(text))
                }
            }
            Err(e) => Err(e.into()),
        };

        if let Err(e) = &result {
            error!(product_id = %product.id, error = %e, "Add to cart failed");
        }
        self.reconcile(snapshot, result.is_ok()).await;
        result
    }

    /// Remove one unit of `product_id`, dropping the line at zero.
    ///
    /// A 403 surfaces as [`AuthError::SessionExpired`], a 401 as
    /// [`AuthError::LoginRequired`].
    pub async fn decrement(&self, product_id: ProductId) -> Result<(), SdkError> {
        let customer = self.client.session.require_customer()?;
        if !product_id.is_valid() {
            return Err(SdkError::InvalidArgument(
                "Product ID is required".to_string(),
            ));
        }

        let key = format!("dec-{product_id}");
        let Some(_guard) = self.client.pending.try_acquire(key.as_str()) else {
            debug!(%key, "Decrement already in flight, skipping");
            return Ok(());
        };

        let snapshot = self.update(|cart| cart.with_decremented(product_id)).await;

        let request = DecrementRequest {
            customer_id: customer.id,
            product_id,
        };
        let result = self
            .client
            .http
            .put::<serde_json::Value, _>("/cart/decrement", &request, RetryPolicy::None)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                HttpError::Forbidden(_) => SdkError::Auth(AuthError::SessionExpired),
                HttpError::Unauthorized(_) => SdkError::Auth(AuthError::LoginRequired),
                other => other.into(),
            });

        if let Err(e) = &result {
            error!(%product_id, error = %e, "Decrement failed");
        }
        self.reconcile(snapshot, result.is_ok()).await;
        result
    }

    /// Replace local state with the server's cart.
    ///
    /// Signed out is not an error: the cart is emptied and an empty list
    /// returned without a request.
    pub async fn fetch(&self) -> Result<Vec<CartLine>, SdkError> {
        let Some(customer) = self.client.session.customer() else {
            self.replace(CartState::new()).await;
            return Ok(Vec::new());
        };

        let lines: Option<Vec<CartLine>> = self
            .client
            .http
            .get(&format!("/cart/{}", customer.id), RetryPolicy::Idempotent)
            .await?;
        let lines = lines.unwrap_or_default();
        self.replace(CartState::from_lines(lines.clone())).await;
        Ok(lines)
    }

    /// Current local lines, optimistic changes included.
    pub async fn items(&self) -> Vec<CartLine> {
        self.client.cart.read().await.lines().to_vec()
    }

    pub async fn state(&self) -> CartState {
        self.client.cart.read().await.clone()
    }

    /// Total units in the cart.
    pub async fn count(&self) -> u32 {
        self.client.cart.read().await.count()
    }

    pub async fn subtotal(&self) -> Decimal {
        self.client.cart.read().await.subtotal()
    }

    /// Whether a mutation for this key (`add-<id>` / `dec-<id>`) is outstanding.
    pub fn is_pending(&self, key: &str) -> bool {
        self.client.pending.contains(key)
    }

    // ── State plumbing ───────────────────────────────────────────────────

    /// Apply `transition` under the write lock and return the prior state.
    async fn update(&self, transition: impl FnOnce(&CartState) -> CartState) -> CartState {
        let mut cart = self.client.cart.write().await;
        let snapshot = cart.clone();
        *cart = transition(&snapshot);
        let next = cart.clone();
        drop(cart);
        self.client.notify(&StoreEvent::CartChanged(next));
        snapshot
    }

    pub(crate) async fn replace(&self, state: CartState) {
        *self.client.cart.write().await = state.clone();
        self.client.notify(&StoreEvent::CartChanged(state));
    }

    /// Converge on the server's cart. If that read fails, a failed mutation
    /// is rolled back to `snapshot`; a successful one keeps its optimistic
    /// state.
    async fn reconcile(&self, snapshot: CartState, mutation_ok: bool) {
        if let Err(e) = self.fetch().await {
            if mutation_ok {
                warn!(error = %e, "Cart refresh failed, keeping optimistic state");
            } else {
                warn!(error = %e, "Cart refresh failed, rolling back");
                self.replace(snapshot).await;
            }
        }
    }
}

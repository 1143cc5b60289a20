//! Orders sub-client — place, history, recovery lookup.

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::client::StoreClient;
use crate::domain::order::convert::{extract_created_order, match_recent, normalize_order};
use crate::domain::order::wire::{non_blank, CreateOrderRequest, OrderItem, PlaceOrderRequest};
use crate::domain::order::Order;
use crate::error::{HttpError, SdkError};
use crate::http::RetryPolicy;
use crate::shared::round_cents;

const FORBIDDEN_ORDER_MESSAGE: &str =
    "You do not have permission to place orders. Please contact support.";

pub struct Orders<'a> {
    pub(crate) client: &'a StoreClient,
}

/// A fully resolved order submission.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedOrder {
    pub body: CreateOrderRequest,
    /// The items came from the live cart, which is refreshed afterwards.
    pub from_cart: bool,
}

impl<'a> Orders<'a> {
    /// Place an order.
    ///
    /// Fails with [`SdkError::EmptyOrder`] before any request when neither
    /// the request nor the cart has items. The created order is normalized
    /// whatever shape the server answered with.
    pub async fn place(&self, request: PlaceOrderRequest) -> Result<Order, SdkError> {
        let resolved = self.resolve(request).await?;
        self.submit(resolved).await
    }

    /// The signed-in customer's order history, normalized, in server order.
    ///
    /// Entries without a readable order id are left out (and logged). Use
    /// [`Orders::fetch_raw`] for the list exactly as the server sent it.
    pub async fn fetch(&self) -> Result<Vec<Order>, SdkError> {
        let raw = self.fetch_raw().await?;
        let total = raw.len();
        let orders: Vec<Order> = raw.into_iter().filter_map(normalize_order).collect();
        if orders.len() < total {
            warn!(skipped = total - orders.len(), "Skipped unreadable orders in history");
        }
        Ok(orders)
    }

    /// The signed-in customer's order history as returned by the server.
    pub async fn fetch_raw(&self) -> Result<Vec<Value>, SdkError> {
        let customer = self.client.session.require_customer()?;
        let raw: Option<Vec<Value>> = self
            .client
            .http
            .get(
                &format!("/orders/customer/{}", customer.id),
                RetryPolicy::Idempotent,
            )
            .await?;
        Ok(raw.unwrap_or_default())
    }

    /// The order that was most likely just placed for `amount`: the newest
    /// order, if its total matches within 0.01 and it is under five minutes
    /// old.
    pub async fn find_recent(&self, amount: Decimal) -> Result<Option<Order>, SdkError> {
        let orders = self.fetch().await?;
        let found = match_recent(&orders, amount, Utc::now()).cloned();
        debug!(%amount, found = ?found.as_ref().map(|o| o.id.get()), "Recent order lookup");
        Ok(found)
    }

    // ── Internals shared with checkout ───────────────────────────────────

    /// Resolve items, total and address into the wire body.
    pub(crate) async fn resolve(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<ResolvedOrder, SdkError> {
        let customer = self.client.session.require_customer()?;

        let from_cart = request.items.is_none();
        let items: Vec<OrderItem> = match request.items {
            Some(items) => items,
            None => self
                .client
                .cart
                .read()
                .await
                .lines()
                .iter()
                .map(OrderItem::from)
                .collect(),
        };
        if items.is_empty() {
            return Err(SdkError::EmptyOrder);
        }

        let total = request
            .amount
            .unwrap_or_else(|| items.iter().map(OrderItem::line_total).sum());
        let shipping_address = non_blank(request.shipping_address.as_deref())
            .or_else(|| customer.address.clone());
        let address = request.address.unwrap_or_default().normalized();

        Ok(ResolvedOrder {
            body: CreateOrderRequest {
                customer_id: customer.id,
                total_amount: round_cents(total),
                items,
                shipping_address,
                location: non_blank(request.location.as_deref()),
                street: address.street,
                city: address.city,
                state: address.state,
                country: address.country,
                pincode: address.pincode,
                coupon_code: non_blank(request.coupon_code.as_deref()),
            },
            from_cart,
        })
    }

    pub(crate) async fn submit(&self, resolved: ResolvedOrder) -> Result<Order, SdkError> {
        let ResolvedOrder { body, from_cart } = resolved;
        debug!(
            customer_id = %body.customer_id,
            total = %body.total_amount,
            items = body.items.len(),
            "Placing order"
        );

        let raw: Value = self
            .client
            .http
            .post_with_timeout(
                "/orders/create",
                &body,
                self.client.order_timeout,
                RetryPolicy::None,
            )
            .await
            .map_err(|e| {
                error!(error = %e, "Order placement failed");
                match e {
                    HttpError::Forbidden(message) => SdkError::Rejected(
                        message.unwrap_or_else(|| FORBIDDEN_ORDER_MESSAGE.to_string()),
                    ),
                    other => other.into(),
                }
            })?;

        if from_cart {
            if let Err(e) = self.client.cart().fetch().await {
                warn!(error = %e, "Cart refresh after order failed; order stands");
            }
        }

        let order = extract_created_order(raw)?;
        info!(order_id = %order.id, "Order placed");
        Ok(order)
    }
}

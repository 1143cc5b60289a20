//! Checkout — order placement raced against a watchdog, with recovery.
//!
//! An order request can hang or fail after the server has already created
//! the order. Checkout therefore:
//!
//! - races placement against the configured watchdog (90 s by default);
//! - on a placement error, looks for a matching just-created order before
//!   giving up;
//! - when the watchdog fires, hands the still-running request back as a
//!   [`PendingOrder`] instead of cancelling it.
//!
//! Placement runs as its own tokio task, so it finishes (including the
//! cart refresh after a confirmed order) even when the caller drops the
//! outcome.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::future::{select, Either};
use futures_timer::Delay;
use rust_decimal::Decimal;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

use super::client::ResolvedOrder;
use super::{Order, PlaceOrderRequest};
use crate::client::StoreClient;
use crate::error::SdkError;

pub struct Checkout<'a> {
    pub(crate) client: &'a StoreClient,
}

/// How a checkout ended.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The server confirmed the order.
    Placed(Order),
    /// Placement failed, but the order shows up in history.
    Recovered(Order),
    /// The watchdog fired first. The request is still running.
    Stalled(PendingOrder),
}

impl CheckoutOutcome {
    /// The order, when one is known.
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Placed(order) | Self::Recovered(order) => Some(order),
            Self::Stalled(_) => None,
        }
    }
}

impl<'a> Checkout<'a> {
    /// Place an order under the watchdog.
    ///
    /// Validation failures (signed out, empty order) return before any
    /// request. A placement error resolves to [`CheckoutOutcome::Recovered`]
    /// if [`Orders::find_recent`] finds the order, otherwise to the original
    /// error. Must be called from within a tokio runtime.
    ///
    /// [`Orders::find_recent`]: crate::domain::order::client::Orders::find_recent
    pub async fn place(&self, request: PlaceOrderRequest) -> Result<CheckoutOutcome, SdkError> {
        let resolved = self.client.orders().resolve(request).await?;
        let expected_total = resolved.body.total_amount;

        let mut placing = spawn_placement(self.client.clone(), resolved)?;
        let watchdog = Delay::new(self.client.order_watchdog);

        let raced = match select(&mut placing, watchdog).await {
            Either::Left((joined, _)) => Some(settle(joined)),
            Either::Right(_) => None,
        };

        match raced {
            Some(Ok(order)) => Ok(CheckoutOutcome::Placed(order)),
            Some(Err(e)) => match recover(self.client, expected_total).await {
                Some(order) => {
                    info!(order_id = %order.id, error = %e, "Order found despite placement error");
                    Ok(CheckoutOutcome::Recovered(order))
                }
                None => Err(e),
            },
            None => {
                warn!(
                    watchdog_secs = self.client.order_watchdog.as_secs(),
                    "Order placement is taking too long"
                );
                Ok(CheckoutOutcome::Stalled(PendingOrder {
                    placing,
                    client: self.client.clone(),
                    expected_total,
                }))
            }
        }
    }
}

/// An order request that outlived the checkout watchdog.
///
/// Awaiting it yields the request's own result. [`PendingOrder::recover`]
/// checks order history in the meantime. Dropping it detaches the request;
/// it still runs to completion.
pub struct PendingOrder {
    placing: JoinHandle<Result<Order, SdkError>>,
    client: StoreClient,
    expected_total: Decimal,
}

impl PendingOrder {
    pub fn expected_total(&self) -> Decimal {
        self.expected_total
    }

    /// The newest matching order in history, if the server already created it.
    pub async fn recover(&self) -> Result<Option<Order>, SdkError> {
        self.client.orders().find_recent(self.expected_total).await
    }

    /// Wait for the original request to finish.
    pub async fn wait(self) -> Result<Order, SdkError> {
        self.await
    }
}

impl Future for PendingOrder {
    type Output = Result<Order, SdkError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.placing).poll(cx).map(settle)
    }
}

impl fmt::Debug for PendingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingOrder")
            .field("expected_total", &self.expected_total)
            .finish_non_exhaustive()
    }
}

fn spawn_placement(
    client: StoreClient,
    resolved: ResolvedOrder,
) -> Result<JoinHandle<Result<Order, SdkError>>, SdkError> {
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|_| SdkError::Config("checkout requires a tokio runtime".into()))?;
    Ok(runtime.spawn(async move { client.orders().submit(resolved).await }))
}

fn settle(joined: Result<Result<Order, SdkError>, JoinError>) -> Result<Order, SdkError> {
    joined.unwrap_or_else(|e| {
        error!(error = %e, "Order placement task failed");
        Err(SdkError::Other(format!("Order placement task failed: {e}")))
    })
}

async fn recover(client: &StoreClient, expected_total: Decimal) -> Option<Order> {
    match client.orders().find_recent(expected_total).await {
        Ok(found) => found,
        Err(e) => {
            warn!(error = %e, "Recovery lookup failed");
            None
        }
    }
}

//! Conversions: order-creation and order-history payloads → [`Order`].
//!
//! `POST /orders/create` has answered with more than one shape over time.
//! The id is looked up in this order:
//!
//! 1. top-level `id` — the order itself
//! 2. `order.id` — the order nested under `order`
//! 3. `orderId` — the order itself, id under another name
//!
//! A payload matching none of these is [`SdkError::UnexpectedResponse`]:
//! the order may still have been created.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::Order;
use crate::error::SdkError;

/// How far a recovered order's total may be from the expected amount.
pub const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// How old the newest order may be and still count as "just placed".
pub const RECOVERY_WINDOW_MINUTES: i64 = 5;

/// Normalize an order-creation response.
pub fn extract_created_order(payload: Value) -> Result<Order, SdkError> {
    let mut object = match payload {
        Value::Object(object) => object,
        other => return Err(unexpected(&other)),
    };

    if positive_id(object.get("id")).is_some() {
        return decode(object);
    }

    if let Some(Value::Object(nested)) = object.get("order") {
        if positive_id(nested.get("id")).is_some() {
            return decode(nested.clone());
        }
    }

    if let Some(id) = positive_id(object.get("orderId")) {
        object.remove("orderId");
        object.insert("id".to_string(), Value::from(id));
        return decode(object);
    }

    Err(unexpected(&Value::Object(object)))
}

/// Normalize one entry of an order-history listing. Entries without a
/// usable id are `None`.
pub fn normalize_order(entry: Value) -> Option<Order> {
    extract_created_order(entry).ok()
}

/// The newest order, if its total matches `amount` within
/// [`AMOUNT_TOLERANCE`] and it is less than [`RECOVERY_WINDOW_MINUTES`] old
/// at `now`. Orders without a date sort as oldest.
pub fn match_recent(orders: &[Order], amount: Decimal, now: DateTime<Utc>) -> Option<&Order> {
    let newest = orders
        .iter()
        .max_by_key(|o| o.order_date.unwrap_or(DateTime::<Utc>::MIN_UTC))?;

    let total = newest.total_amount?;
    if (total - amount).abs() >= AMOUNT_TOLERANCE {
        return None;
    }

    let placed = newest.order_date?;
    (now - placed < Duration::minutes(RECOVERY_WINDOW_MINUTES)).then_some(newest)
}

fn positive_id(value: Option<&Value>) -> Option<i64> {
    let id = match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}

fn decode(object: Map<String, Value>) -> Result<Order, SdkError> {
    serde_json::from_value(Value::Object(object))
        .map_err(|e| SdkError::UnexpectedResponse(format!("order could not be read: {e}")))
}

fn unexpected(payload: &Value) -> SdkError {
    let mut shown = payload.to_string();
    if shown.len() > 120 {
        let cut = (0..=120).rev().find(|&i| shown.is_char_boundary(i)).unwrap_or(0);
        shown.truncate(cut);
        shown.push('…');
    }
    SdkError::UnexpectedResponse(format!(
        "no order id in {shown}. The order may have been placed; check order history."
    ))
}

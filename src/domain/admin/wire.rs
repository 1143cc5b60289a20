//! Wire types for admin requests and responses.

use serde::{Deserialize, Serialize};

use super::OrderStatus;

/// Body of `PUT /admin/orders/{id}/status`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Response of `PUT /admin/orders/{id}/status`. The order is kept raw and
/// normalized by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order: Option<serde_json::Value>,
}

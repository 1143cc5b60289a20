//! Wishlist request/response bodies.

use serde::{Deserialize, Serialize};

use crate::shared::ProductId;

/// Body of both `POST /wishlist/add` and `POST /wishlist/remove`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub product_id: ProductId,
}

/// `GET /wishlist/check/{productId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WishlistCheckResponse {
    #[serde(rename = "inWishList", alias = "inWishlist", default)]
    pub in_wishlist: bool,
}

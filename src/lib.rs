//! # BuyGreen SDK
//!
//! A Rust client for the BuyGreen storefront API: catalog browsing, cart,
//! wishlist, checkout, order history, reviews and a minimal admin product
//! manager.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Id newtypes, domain slices, errors, configuration
//! 2. **Session** — `SessionStore` capability + typed view over persisted keys
//! 3. **HTTP** — `StoreHttp` with bearer auth, status mapping and retry policies
//! 4. **Utilities** — TTL response cache, recently-viewed history
//! 5. **High-Level Client** — `StoreClient` with nested sub-clients and
//!    optimistic cart/wishlist state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use buygreen_sdk::prelude::*;
//!
//! let client = StoreClient::builder()
//!     .base_url("http://localhost:8080")
//!     .build()?;
//!
//! client.auth().login("jane@example.com", "secret").await?;
//! let page = client.products().list(0, 12).await?;
//! client.cart().add(&page.content[0], 1).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and helpers used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, state, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL and endpoint constants.
pub mod network;

/// Client configuration (builder defaults + environment loading).
pub mod config;

// ── Layer 2: Session ─────────────────────────────────────────────────────────

/// Persisted session storage (profile, token, browsing history).
pub mod session;

/// Authentication: login, signup, logout, form validation.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with transport seam and retry policies.
pub mod http;

// ── Layer 4: Utilities ───────────────────────────────────────────────────────

/// Generic TTL cache for API responses.
pub mod cache;

/// Recently-viewed products and category recommendations.
pub mod history;

mod inflight;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `StoreClient` — the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{CustomerId, OrderId, ProductId};

    // Domain types
    pub use crate::domain::cart::{CartLine, CartState};
    pub use crate::domain::admin::OrderStatus;
    pub use crate::domain::coupon::{AppliedCoupon, CouponSummary, CouponValidation, DiscountType};
    pub use crate::domain::order::{
        AddressData, CheckoutOutcome, Order, OrderItem, PendingOrder, PlaceOrderRequest,
    };
    pub use crate::domain::payment::PaymentOrder;
    pub use crate::domain::product::{Page, Product, ProductInput};
    pub use crate::domain::review::{Review, ReviewEligibility};
    pub use crate::domain::wishlist::WishlistEntry;

    // History + cache
    pub use crate::cache::TtlCache;
    pub use crate::history::{RecentlyViewed, RecentlyViewedEntry};

    // Auth
    pub use crate::auth::SignupRequest;

    // Errors
    pub use crate::error::{AuthError, HttpError, SdkError, SessionError};

    // Config + network
    pub use crate::config::ClientConfig;
    pub use crate::network::DEFAULT_API_URL;

    // Session
    pub use crate::session::{Customer, FileSessionStore, MemorySessionStore, Session, SessionStore};

    // HTTP client + sub-clients
    pub use crate::client::{
        AdminClient, AuthClient, CartClient, CheckoutClient, CouponsClient, OrdersClient,
        ListenerId, PaymentsClient, ProductsClient, ReviewsClient, StoreClient,
        StoreClientBuilder, StoreEvent, WishlistClient,
    };
    pub use crate::http::retry::{Backoff, RetryConfig, RetryPolicy};
    pub use crate::http::transport::{HttpRequest, HttpResponse, Transport, TransportError};
}

//! High-level client — `StoreClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared cart/wishlist state, change
//! listeners and the accessor methods.

use crate::auth::client::Auth;
use crate::cache::TtlCache;
use crate::config::ClientConfig;
use crate::domain::admin::client::Admin;
use crate::domain::cart::client::Cart;
use crate::domain::cart::CartState;
use crate::domain::coupon::client::Coupons;
use crate::domain::order::checkout::Checkout;
use crate::domain::order::client::Orders;
use crate::domain::payment::client::Payments;
use crate::domain::product::client::Products;
use crate::domain::review::client::Reviews;
use crate::domain::wishlist::client::Wishlist;
use crate::domain::wishlist::WishlistEntry;
use crate::error::SdkError;
use crate::history::RecentlyViewed;
use crate::http::retry::RetryConfig;
use crate::http::transport::{ReqwestTransport, Transport};
use crate::http::StoreHttp;
use crate::inflight::InFlight;
use crate::session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

use async_lock::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

// Re-export sub-client types for convenience.
pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::admin::client::Admin as AdminClient;
pub use crate::domain::cart::client::Cart as CartClient;
pub use crate::domain::coupon::client::Coupons as CouponsClient;
pub use crate::domain::order::checkout::Checkout as CheckoutClient;
pub use crate::domain::order::client::Orders as OrdersClient;
pub use crate::domain::payment::client::Payments as PaymentsClient;
pub use crate::domain::product::client::Products as ProductsClient;
pub use crate::domain::review::client::Reviews as ReviewsClient;
pub use crate::domain::wishlist::client::Wishlist as WishlistClient;

/// Emitted after every change to the shared cart or wishlist, optimistic
/// updates and rollbacks included.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    CartChanged(CartState),
    WishlistChanged(Vec<WishlistEntry>),
}

/// Handle returned by [`StoreClient::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Listener)>>,
}

/// The primary entry point for the BuyGreen SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.products()`, `client.cart()`, etc. Clones share all state.
pub struct StoreClient {
    pub(crate) http: StoreHttp,
    pub(crate) session: Session,
    /// Shopper's cart, mirrored from `GET /cart/{customerId}`.
    pub(crate) cart: Arc<RwLock<CartState>>,
    pub(crate) wishlist: Arc<RwLock<Vec<WishlistEntry>>>,
    /// Keys of cart/wishlist mutations currently in flight.
    pub(crate) pending: InFlight,
    pub(crate) listeners: Arc<Listeners>,
    pub(crate) history: RecentlyViewed,
    /// Raw JSON of cached catalog responses.
    pub(crate) response_cache: Arc<TtlCache<serde_json::Value>>,
    pub(crate) order_timeout: Duration,
    pub(crate) order_watchdog: Duration,
    pub(crate) receipt_prefix: String,
    pub(crate) currency: String,
}

impl StoreClient {
    pub fn builder() -> StoreClientBuilder {
        StoreClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn products(&self) -> Products<'_> {
        Products { client: self }
    }

    pub fn cart(&self) -> Cart<'_> {
        Cart { client: self }
    }

    pub fn wishlist(&self) -> Wishlist<'_> {
        Wishlist { client: self }
    }

    pub fn orders(&self) -> Orders<'_> {
        Orders { client: self }
    }

    pub fn checkout(&self) -> Checkout<'_> {
        Checkout { client: self }
    }

    pub fn payments(&self) -> Payments<'_> {
        Payments { client: self }
    }

    pub fn coupons(&self) -> Coupons<'_> {
        Coupons { client: self }
    }

    pub fn reviews(&self) -> Reviews<'_> {
        Reviews { client: self }
    }

    pub fn admin(&self) -> Admin<'_> {
        Admin { client: self }
    }

    /// Recently-viewed products. Works signed in or out.
    pub fn history(&self) -> &RecentlyViewed {
        &self.history
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    // ── Change listeners ─────────────────────────────────────────────────

    /// Register `listener` for cart and wishlist changes.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.listeners.next_id.fetch_add(1, Ordering::Relaxed));
        match self.listeners.entries.lock() {
            Ok(mut entries) => entries.push((id, Arc::new(listener))),
            Err(_) => warn!("Listener registry poisoned; listener dropped"),
        }
        id
    }

    /// Returns `false` when `id` was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let Ok(mut entries) = self.listeners.entries.lock() else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    /// Fan `event` out to every listener. Listeners run outside the lock.
    pub(crate) fn notify(&self, event: &StoreEvent) {
        let snapshot: Vec<Listener> = match self.listeners.entries.lock() {
            Ok(entries) => entries.iter().map(|(_, l)| l.clone()).collect(),
            Err(_) => return,
        };
        for listener in snapshot {
            listener(event);
        }
    }

    /// Drop every cached catalog response.
    pub fn clear_caches(&self) {
        self.response_cache.clear(None);
    }
}

impl Clone for StoreClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            session: self.session.clone(),
            cart: self.cart.clone(),
            wishlist: self.wishlist.clone(),
            pending: self.pending.clone(),
            listeners: self.listeners.clone(),
            history: self.history.clone(),
            response_cache: self.response_cache.clone(),
            order_timeout: self.order_timeout,
            order_watchdog: self.order_watchdog,
            receipt_prefix: self.receipt_prefix.clone(),
            currency: self.currency.clone(),
        }
    }
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("base_url", &self.http.base_url())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct StoreClientBuilder {
    config: ClientConfig,
    session_store: Option<Arc<dyn SessionStore>>,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for StoreClientBuilder {
    fn default() -> Self {
        Self::from_config(ClientConfig::default())
    }
}

impl StoreClientBuilder {
    /// Start from a prepared config, e.g. [`ClientConfig::from_env`].
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            session_store: None,
            transport: None,
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    /// Where the session lives. Defaults to a file store when the config
    /// names one, otherwise to memory.
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Replace the reqwest transport, e.g. with a test double.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Retry behaviour of idempotent requests.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn order_timeout(mut self, timeout: Duration) -> Self {
        self.config.order_timeout = timeout;
        self
    }

    pub fn order_watchdog(mut self, watchdog: Duration) -> Self {
        self.config.order_watchdog = watchdog;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// `None` disables the background sweep.
    pub fn cache_sweep_interval(mut self, interval: Option<Duration>) -> Self {
        self.config.cache_sweep_interval = interval;
        self
    }

    pub fn currency(mut self, currency: &str) -> Self {
        self.config.currency = currency.to_string();
        self
    }

    pub fn receipt_prefix(mut self, prefix: &str) -> Self {
        self.config.receipt_prefix = prefix.to_string();
        self
    }

    pub fn build(self) -> Result<StoreClient, SdkError> {
        let config = self.config;
        if config.base_url.trim().is_empty() {
            return Err(SdkError::Config("base_url must not be empty".to_string()));
        }

        let store: Arc<dyn SessionStore> = match (self.session_store, &config.session_file) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(FileSessionStore::new(path.clone())),
            (None, None) => Arc::new(MemorySessionStore::new()),
        };
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };

        let session = Session::new(store.clone());
        let response_cache = Arc::new(TtlCache::new(config.cache_ttl));
        if let Some(interval) = config.cache_sweep_interval {
            if tokio::runtime::Handle::try_current().is_ok() {
                response_cache.spawn_sweeper(interval);
            } else {
                debug!("No tokio runtime; cache sweeper not started");
            }
        }

        Ok(StoreClient {
            http: StoreHttp::new(
                &config.base_url,
                transport,
                session.clone(),
                config.retry,
                config.request_timeout,
            ),
            session,
            cart: Arc::new(RwLock::new(CartState::new())),
            wishlist: Arc::new(RwLock::new(Vec::new())),
            pending: InFlight::new(),
            listeners: Arc::new(Listeners::default()),
            history: RecentlyViewed::new(store),
            response_cache,
            order_timeout: config.order_timeout,
            order_watchdog: config.order_watchdog,
            receipt_prefix: config.receipt_prefix,
            currency: config.currency,
        })
    }
}

//! Products sub-client — fetch, list, search, recommend. GETs are memoised
//! in the client's TTL response cache.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::client::StoreClient;
use crate::domain::product::{Page, Product};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::ProductId;

/// Sub-client for catalog operations.
pub struct Products<'a> {
    pub(crate) client: &'a StoreClient,
}

impl<'a> Products<'a> {
    /// Get a product by id.
    pub async fn get(&self, id: ProductId) -> Result<Product, SdkError> {
        let path = format!("/products/{id}");
        self.cached(&path, &path).await
    }

    /// One page of the full catalog.
    pub async fn list(&self, page: u32, size: u32) -> Result<Page<Product>, SdkError> {
        let key = TtlCache::<()>::generate_key("/products/all", [("page", page), ("size", size)]);
        let path = format!("/products/all?page={page}&size={size}");
        self.cached(&key, &path).await
    }

    /// Full-text search.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Product>, SdkError> {
        let key = TtlCache::<()>::generate_key(
            "/products/search",
            [
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        );
        let path = format!(
            "/products/search?query={}&page={page}&size={size}",
            urlencoding::encode(query)
        );
        self.cached(&key, &path).await
    }

    /// Products picked from the shopper's most-viewed categories.
    ///
    /// With no browsing history this is the first catalog page. Otherwise the
    /// top two categories are sampled, then topped up with other products.
    /// Individual category failures are logged and skipped.
    pub async fn recommended(&self, limit: usize) -> Result<Vec<Product>, SdkError> {
        let size = u32::try_from(limit).unwrap_or(u32::MAX);
        let categories = self.client.history().recommended_categories();
        if categories.is_empty() {
            return Ok(self.list(0, size).await?.content);
        }

        let per_category = u32::try_from(limit.div_ceil(categories.len())).unwrap_or(u32::MAX);
        let mut picked: Vec<Product> = Vec::with_capacity(limit);

        for category in categories.iter().take(2) {
            match self.list(0, per_category).await {
                Ok(page) => picked.extend(
                    page.content
                        .into_iter()
                        .filter(|p| p.is_in_category(category)),
                ),
                Err(e) => warn!(%category, error = %e, "Failed to fetch category products"),
            }
        }

        if picked.len() < limit {
            let fill = self.list(0, size).await?.content;
            let missing = limit - picked.len();
            let extra: Vec<Product> = fill
                .into_iter()
                .filter(|p| !picked.iter().any(|q| q.id == p.id))
                .take(missing)
                .collect();
            picked.extend(extra);
        }

        picked.truncate(limit);
        debug!(count = picked.len(), ?categories, "Built recommendations");
        Ok(picked)
    }

    /// Drop every cached catalog response.
    pub fn clear_cache(&self) {
        self.client.response_cache.clear(None);
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str, path: &str) -> Result<T, SdkError> {
        if let Some(hit) = self.client.response_cache.get(key) {
            match serde_json::from_value(hit) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!(key, error = %e, "Discarding undecodable cache entry");
                    self.client.response_cache.clear(Some(key));
                }
            }
        }

        let raw: serde_json::Value = self.client.http.get(path, RetryPolicy::Idempotent).await?;
        let value = serde_json::from_value(raw.clone())?;
        self.client.response_cache.set(key, raw);
        Ok(value)
    }
}

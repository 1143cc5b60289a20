//! Recently-viewed products and the category recommendation signal derived
//! from them.
//!
//! The list lives in the session store under [`RECENTLY_VIEWED_KEY`] as a
//! JSON array, most recent first, at most [`MAX_RECENTLY_VIEWED`] entries,
//! unique by product id. Every write rewrites the whole array.
//!
//! Nothing here returns an error: storage and parse failures are logged and
//! read as an empty history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::product::Product;
use crate::session::SessionStore;
use crate::shared::ProductId;

pub const RECENTLY_VIEWED_KEY: &str = "buygreen_recently_viewed";
pub const MAX_RECENTLY_VIEWED: usize = 12;
pub const DEFAULT_RECENT_LIMIT: usize = 6;
pub const MAX_RECOMMENDED_CATEGORIES: usize = 3;

/// Snapshot of a product at the moment it was viewed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyViewedEntry {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

impl RecentlyViewedEntry {
    pub fn from_product(product: &Product, viewed_at: DateTime<Utc>) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.primary_image().map(str::to_string),
            category: product.category.clone(),
            viewed_at,
        }
    }
}

/// Browsing-history store over a [`SessionStore`].
#[derive(Clone)]
pub struct RecentlyViewed {
    store: Arc<dyn SessionStore>,
}

impl RecentlyViewed {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Record a product view. Products without a valid id are ignored.
    pub fn add(&self, product: &Product) {
        if !product.id.is_valid() {
            return;
        }
        let entry = RecentlyViewedEntry::from_product(product, Utc::now());
        let list = push_front(self.load(), entry, MAX_RECENTLY_VIEWED);
        self.save(&list);
    }

    /// The `limit` most recent entries.
    pub fn recent(&self, limit: usize) -> Vec<RecentlyViewedEntry> {
        let mut list = self.load();
        list.truncate(limit);
        list
    }

    /// Up to three categories, most frequently viewed first.
    pub fn recommended_categories(&self) -> Vec<String> {
        top_categories(&self.load(), MAX_RECOMMENDED_CATEGORIES)
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(RECENTLY_VIEWED_KEY) {
            warn!(error = %e, "Failed to clear recently viewed");
        }
    }

    fn load(&self) -> Vec<RecentlyViewedEntry> {
        let raw = match self.store.get(RECENTLY_VIEWED_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read recently viewed");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unparsable recently viewed list");
            Vec::new()
        })
    }

    fn save(&self, list: &[RecentlyViewedEntry]) {
        let result = serde_json::to_string(list)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.store
                    .set(RECENTLY_VIEWED_KEY, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!(error = %e, "Failed to save recently viewed");
        }
    }
}

impl std::fmt::Debug for RecentlyViewed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentlyViewed").finish_non_exhaustive()
    }
}

/// Move-to-front insert, dropping anything beyond `cap`.
fn push_front(
    mut list: Vec<RecentlyViewedEntry>,
    entry: RecentlyViewedEntry,
    cap: usize,
) -> Vec<RecentlyViewedEntry> {
    list.retain(|e| e.id != entry.id);
    list.insert(0, entry);
    list.truncate(cap);
    list
}

/// Categories by descending count; ties keep first-seen order.
fn top_categories(list: &[RecentlyViewedEntry], n: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for category in list.iter().filter_map(|e| e.category.as_deref()) {
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, count)) => *count += 1,
            None => counts.push((category, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(c, _)| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn product(id: i64, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Decimal::new(id * 100, 2),
            image_urls: vec![format!("https://cdn.test/{id}.png")],
            image_url: None,
            stock_quantity: 1,
            category: Some(category.to_string()),
        }
    }

    fn history() -> (RecentlyViewed, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (RecentlyViewed::new(store.clone()), store)
    }

    fn ids(list: &[RecentlyViewedEntry]) -> Vec<i64> {
        list.iter().map(|e| e.id.get()).collect()
    }

    #[test]
    fn test_most_recent_first_and_capped() {
        let (h, _) = history();
        for id in 1..=20 {
            h.add(&product(id, "Home"));
        }
        let all = h.recent(100);
        assert_eq!(all.len(), MAX_RECENTLY_VIEWED);
        assert_eq!(all[0].id.get(), 20);
        assert_eq!(all[11].id.get(), 9);
    }

    #[test]
    fn test_reviewing_moves_to_front_without_duplicating() {
        let (h, _) = history();
        h.add(&product(1, "Home"));
        h.add(&product(2, "Home"));
        h.add(&product(3, "Home"));
        h.add(&product(1, "Home"));
        assert_eq!(ids(&h.recent(10)), vec![1, 3, 2]);
    }

    #[test]
    fn test_invariants_hold_for_arbitrary_sequences() {
        let (h, _) = history();
        let views = [5, 3, 5, 9, 1, 2, 3, 14, 15, 16, 17, 18, 19, 20, 21, 5, 3, 22, 1];
        for id in views {
            h.add(&product(id, "Garden"));
            let list = h.recent(usize::MAX);
            assert!(list.len() <= MAX_RECENTLY_VIEWED);
            assert_eq!(list[0].id.get(), id);
            let mut seen = ids(&list);
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), list.len());
            assert!(list.windows(2).all(|w| w[0].viewed_at >= w[1].viewed_at));
        }
    }

    #[test]
    fn test_invalid_id_is_ignored() {
        let (h, store) = history();
        h.add(&product(0, "Home"));
        assert!(h.recent(6).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_recent_respects_limit() {
        let (h, _) = history();
        for id in 1..=4 {
            h.add(&product(id, "Home"));
        }
        assert_eq!(h.recent(DEFAULT_RECENT_LIMIT).len(), 4);
        assert_eq!(ids(&h.recent(2)), vec![4, 3]);
        assert!(h.recent(0).is_empty());
    }

    #[test]
    fn test_corrupt_storage_reads_empty() {
        let (h, store) = history();
        store.set(RECENTLY_VIEWED_KEY, "{{{oops").unwrap();
        assert!(h.recent(6).is_empty());
        assert!(h.recommended_categories().is_empty());

        // A new view overwrites the corrupt value.
        h.add(&product(1, "Home"));
        assert_eq!(ids(&h.recent(6)), vec![1]);
    }

    #[test]
    fn test_recommended_categories() {
        let (h, _) = history();
        h.add(&product(1, "Kitchen"));
        h.add(&product(2, "Garden"));
        h.add(&product(3, "Garden"));
        h.add(&product(4, "Bath"));
        h.add(&product(5, "Garden"));
        h.add(&product(6, "Bath"));
        h.add(&product(7, "Toys"));

        let top = h.recommended_categories();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0], "Garden");
        assert_eq!(top[1], "Bath");
    }

    #[test]
    fn test_entries_without_category_are_not_counted() {
        let list = vec![RecentlyViewedEntry {
            id: ProductId::new(1),
            name: "x".into(),
            price: Decimal::ONE,
            image_url: None,
            category: None,
            viewed_at: Utc::now(),
        }];
        assert!(top_categories(&list, 3).is_empty());
    }

    #[test]
    fn test_clear() {
        let (h, _) = history();
        h.add(&product(1, "Home"));
        h.clear();
        assert!(h.recent(6).is_empty());
    }

    #[test]
    fn test_snapshot_uses_first_image() {
        let entry = RecentlyViewedEntry::from_product(&product(8, "Home"), Utc::now());
        assert_eq!(entry.image_url.as_deref(), Some("https://cdn.test/8.png"));
    }
}

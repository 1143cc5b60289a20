//! Product domain — catalog entries, pages, admin input.

pub mod client;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::shared::validation::{
    validate_image_urls, validate_price, validate_required, validate_stock,
};
use crate::shared::{serde_util, ProductId};

// ─── Product ─────────────────────────────────────────────────────────────────

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default, deserialize_with = "serde_util::null_as_default")]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// The single image to show in lists: `imageUrl`, else the first of `imageUrls`.
    pub fn primary_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or_else(|| self.image_urls.first().map(String::as_str))
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    pub fn is_in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
    }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "serde_util::null_as_default")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.number + 1 >= self.total_pages
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
            total_elements: 0,
            number: 0,
            size: 0,
        }
    }
}

// ─── ProductInput ────────────────────────────────────────────────────────────

/// Body of the admin add/update product calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_urls: Vec<String>,
    pub stock_quantity: i64,
    pub category: String,
}

impl ProductInput {
    /// Run the admin form validators; the first failure wins.
    pub fn validate(&self) -> Result<(), SdkError> {
        validate_required(&self.name, "Product name").into_result()?;
        validate_required(&self.category, "Category").into_result()?;
        validate_price(self.price, Decimal::ZERO).into_result()?;
        validate_stock(self.stock_quantity).into_result()?;
        validate_image_urls(&self.image_urls).into_result()
    }
}

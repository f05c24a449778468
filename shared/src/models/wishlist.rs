//! Wishlist entry model
//!
//! Upstream responses are inconsistent about identifiers: product pages key
//! entries by `slug`, while some API responses expose numeric `id` or
//! `product_id` fields instead. The membership set registers every key an
//! entry carries so lookups succeed by either.

use serde::{Deserialize, Serialize};

/// One membership key - a slug or a numeric id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum WishlistKey {
    Id(i64),
    Slug(String),
}

/// Wishlist entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistEntry {
    /// Primary lookup key from product pages
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl WishlistEntry {
    /// Minimal entry carrying only identity, for optimistic inserts
    pub fn from_keys(slug: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            slug: slug.into(),
            id,
            product_id: None,
            name: String::new(),
            image: String::new(),
            price: None,
        }
    }

    /// Every membership key this entry exposes
    pub fn keys(&self) -> Vec<WishlistKey> {
        let mut keys = vec![WishlistKey::Slug(self.slug.clone())];
        if let Some(id) = self.id {
            keys.push(WishlistKey::Id(id));
        }
        if let Some(product_id) = self.product_id
            && Some(product_id) != self.id
        {
            keys.push(WishlistKey::Id(product_id));
        }
        keys
    }
}

//! Collaborator interface to the storefront backend
//!
//! The core never talks HTTP directly; everything goes through
//! [`StorefrontApi`] so tests and offline demos can inject their own
//! implementation. [`HttpApi`] is the production implementation.

pub(crate) mod envelope;
pub mod http;

pub use http::HttpApi;

use crate::error::ClientResult;
use async_trait::async_trait;
use shared::{Promotion, VariantDisplay, WishlistEntry};
use std::collections::HashMap;

/// Backend operations the core depends on
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Current promotion map keyed by `variant_<id>` / `product_<id>`
    async fn fetch_active_promotions(&self) -> ClientResult<HashMap<String, Promotion>>;

    /// Display metadata for a variant (used when injecting gift lines)
    async fn fetch_variant_display(&self, variant_id: i64) -> ClientResult<VariantDisplay>;

    /// Full wishlist for a user, already shape-normalized
    async fn fetch_wishlist(&self, user_key: &str) -> ClientResult<Vec<WishlistEntry>>;

    /// Add an entry to the authenticated user's wishlist
    async fn add_wishlist_entry(&self, slug: &str) -> ClientResult<()>;

    /// Remove an entry from the authenticated user's wishlist
    async fn remove_wishlist_entry(&self, slug: &str) -> ClientResult<()>;
}

//! Glow Client - storefront client core
//!
//! Owns the two pieces of client state that outlive any single view: the
//! shopping cart (with promotion-driven gift injection) and the wishlist
//! cache shared across UI surfaces. Both persist snapshots to a durable
//! local store and notify subscribers on every change; the backend is
//! reached through the [`StorefrontApi`] collaborator interface.

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod pricing;
pub mod session;
pub mod storage;
pub mod wishlist;

pub use api::{HttpApi, StorefrontApi};
pub use cart::{CartEvent, CartStore};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use pricing::calculator::CartTotals;
pub use session::StorefrontSession;
pub use storage::{SnapshotStorage, StorageError, StorageResult};
pub use wishlist::{WishlistEvent, WishlistEventKind, WishlistService};

// Re-export shared types for convenience
pub use shared::{
    CartItemDraft, CartLineItem, DiscountType, ItemOption, Promotion, PromotionRule,
    VariantDisplay, WishlistEntry, WishlistKey,
};

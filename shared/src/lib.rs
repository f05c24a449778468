//! Shared types for the glow storefront
//!
//! Domain models exchanged between the client core and the backend API:
//! cart line items, promotions, variant display data and wishlist entries.

pub mod models;

// Re-exports
pub use models::line_item::{CartItemDraft, CartLineItem, ItemOption};
pub use models::promotion::{DiscountType, Promotion, PromotionRule};
pub use models::variant::VariantDisplay;
pub use models::wishlist::{WishlistEntry, WishlistKey};

//! Data models
//!
//! Shared between the client core and the rendering layer (via API).
//! All catalog IDs are `i64`; prices are `f64` rounded to 2 decimal places
//! by the pricing layer before storage.

pub mod line_item;
pub mod promotion;
pub mod variant;
pub mod wishlist;

// Re-exports
pub use line_item::*;
pub use promotion::*;
pub use variant::*;
pub use wishlist::*;

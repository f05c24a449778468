//! Cart state management
//!
//! [`CartStore`] owns the real purchase lines and keeps the gift lines
//! consistent with active promotions. Mutations persist a snapshot, notify
//! subscribers and run a reconciliation pass; see [`store`] for the flow.

mod identity;
mod reconcile;
mod store;

pub use store::{CartEvent, CartStore};

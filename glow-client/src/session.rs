//! Session facade wiring the backend client, snapshot storage, cart and
//! wishlist together

use crate::api::{HttpApi, StorefrontApi};
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::storage::{SnapshotStorage, StorageResult};
use crate::wishlist::WishlistService;
use std::sync::Arc;

/// One storefront session: cart and wishlist sharing a backend client and a
/// snapshot database. Construct once per page session; the cart restores its
/// snapshot immediately, the wishlist seeds lazily per user.
pub struct StorefrontSession {
    pub cart: CartStore,
    pub wishlist: WishlistService,
}

impl StorefrontSession {
    /// Open the snapshot database at the configured path and wire the HTTP
    /// backend
    pub fn open(config: &ClientConfig) -> StorageResult<Self> {
        let storage = SnapshotStorage::open(&config.storage_path)?;
        Ok(Self::with_parts(Arc::new(HttpApi::new(config)), storage))
    }

    /// Wire an explicit backend and storage (tests and demos inject their
    /// own here)
    pub fn with_parts(api: Arc<dyn StorefrontApi>, storage: SnapshotStorage) -> Self {
        Self {
            cart: CartStore::new(api.clone(), storage.clone()),
            wishlist: WishlistService::new(api, storage),
        }
    }
}

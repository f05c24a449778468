//! Wishlist cache - single source of truth for "is this product wishlisted"
//!
//! Several independent UI surfaces (header badge, drawer, product cards)
//! share one cache keyed by user identity. Loads are single-flight, lookups
//! never fetch, and mutations broadcast so mounted observers re-derive their
//! state without refetching.
//!
//! # State machine (per user key)
//!
//! ```text
//! Empty ──seed_from_storage──▶ Seeded ──ensure_loaded──▶ Loaded
//!   ▲                                                      │
//!   └──────────── identity change (invalidate + reseed) ◀──┘
//! ```
//!
//! Mutations are valid from `Seeded` or `Loaded` and keep the state in place.

use crate::api::StorefrontApi;
use crate::error::{ClientError, ClientResult};
use crate::storage::SnapshotStorage;
use parking_lot::RwLock;
use shared::{WishlistEntry, WishlistKey};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Wishlist change channel capacity
const WISHLIST_CHANNEL_CAPACITY: usize = 64;

/// Cache lifecycle per user key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CacheStatus {
    /// Nothing known for the current user
    #[default]
    Empty,
    /// Restored from durable storage, not yet confirmed against the backend
    Seeded,
    /// Backend fetch completed
    Loaded,
}

/// Wishlist change notification
#[derive(Debug, Clone)]
pub struct WishlistEvent {
    pub user_key: String,
    pub kind: WishlistEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistEventKind {
    Added { slug: String },
    Removed { slug: String },
    /// Full list replaced by a backend fetch
    Reloaded,
    /// Cache dropped on user identity change
    Invalidated,
}

#[derive(Debug, Default)]
struct WishlistState {
    /// User identity the cache currently reflects
    loaded_for: Option<String>,
    status: CacheStatus,
    /// Deduplicated membership keys (slugs and numeric ids mixed)
    set: HashSet<WishlistKey>,
    /// Full entries for rendering
    list: Vec<WishlistEntry>,
}

/// Shared wishlist cache, one per session
pub struct WishlistService {
    api: Arc<dyn StorefrontApi>,
    storage: SnapshotStorage,
    state: Arc<RwLock<WishlistState>>,
    /// Single-flight guard: concurrent loads queue here and share one fetch
    load_guard: Mutex<()>,
    event_tx: broadcast::Sender<WishlistEvent>,
}

impl std::fmt::Debug for WishlistService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("WishlistService")
            .field("loaded_for", &state.loaded_for)
            .field("status", &state.status)
            .field("entries", &state.list.len())
            .finish()
    }
}

impl WishlistService {
    pub fn new(api: Arc<dyn StorefrontApi>, storage: SnapshotStorage) -> Self {
        let (event_tx, _) = broadcast::channel(WISHLIST_CHANNEL_CAPACITY);
        Self {
            api,
            storage,
            state: Arc::new(RwLock::new(WishlistState::default())),
            load_guard: Mutex::new(()),
            event_tx,
        }
    }

    /// Subscribe to wishlist change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<WishlistEvent> {
        self.event_tx.subscribe()
    }

    /// Restore the persisted set/list pair for this user, if present.
    /// No network call; marks the cache as reflecting `user_key` either way.
    pub fn seed_from_storage(&self, user_key: &str) {
        let restored = match self.storage.load_wishlist(user_key) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(user_key, error = %e, "Failed to read wishlist snapshot");
                None
            }
        };

        let mut state = self.state.write();
        state.loaded_for = Some(user_key.to_string());
        match restored {
            Some((set, list)) => {
                state.set = set.into_iter().collect();
                state.list = list;
                state.status = CacheStatus::Seeded;
                tracing::debug!(user_key, entries = state.list.len(), "Wishlist seeded from storage");
            }
            None => {
                state.set.clear();
                state.list.clear();
                state.status = CacheStatus::Empty;
            }
        }
    }

    /// Make the cache authoritative for this user.
    ///
    /// Cache hit: already reflecting this user with a non-empty list.
    /// An identity change invalidates the cache and reseeds for the new user
    /// before fetching. Concurrent callers share a single fetch. A fetch
    /// failure resolves to an empty list and never propagates to the caller.
    pub async fn ensure_loaded(&self, user_key: &str) {
        if self.is_fresh(user_key) {
            return;
        }
        self.sync_identity(user_key);
        if self.is_fresh(user_key) {
            return;
        }

        let _flight = self.load_guard.lock().await;
        // another caller may have completed the load while we queued,
        // or the identity may have moved again
        self.sync_identity(user_key);
        if self.is_fresh(user_key) {
            return;
        }

        let entries = match self.api.fetch_wishlist(user_key).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(user_key, error = %e, "Wishlist fetch failed, resolving empty");
                Vec::new()
            }
        };

        {
            let mut state = self.state.write();
            state.loaded_for = Some(user_key.to_string());
            state.set = entries.iter().flat_map(|entry| entry.keys()).collect();
            state.list = entries;
            state.status = CacheStatus::Loaded;
        }
        self.persist(user_key);
        self.notify(user_key, WishlistEventKind::Reloaded);
    }

    /// Pure membership lookup by either key. Never fetches; callers are
    /// responsible for a prior `ensure_loaded` or seed.
    pub fn has(&self, slug: Option<&str>, id: Option<i64>) -> bool {
        let state = self.state.read();
        if let Some(slug) = slug
            && state.set.contains(&WishlistKey::Slug(slug.to_string()))
        {
            return true;
        }
        if let Some(id) = id
            && state.set.contains(&WishlistKey::Id(id))
        {
            return true;
        }
        false
    }

    /// Full entry list for rendering
    pub fn entries(&self) -> Vec<WishlistEntry> {
        self.state.read().list.clone()
    }

    /// Optimistically add, persist, broadcast, then sync to the backend.
    ///
    /// A backend "already exists" rejection counts as success. Any other
    /// rejection reverts the local change and is returned so the caller can
    /// prompt re-authentication.
    pub async fn add(
        &self,
        user_key: &str,
        slug: &str,
        id: Option<i64>,
        entry: Option<WishlistEntry>,
    ) -> ClientResult<()> {
        let entry = entry.unwrap_or_else(|| WishlistEntry::from_keys(slug, id));
        {
            let mut state = self.state.write();
            state.set.insert(WishlistKey::Slug(slug.to_string()));
            if let Some(id) = id {
                state.set.insert(WishlistKey::Id(id));
            }
            if !state.list.iter().any(|e| e.slug == slug) {
                state.list.push(entry);
            }
        }
        self.persist(user_key);
        self.notify(
            user_key,
            WishlistEventKind::Added {
                slug: slug.to_string(),
            },
        );

        match self.api.add_wishlist_entry(slug).await {
            Ok(()) => Ok(()),
            // already wishlisted upstream - local state is already correct
            Err(ClientError::Conflict(_)) => Ok(()),
            Err(e) => {
                tracing::warn!(user_key, slug, error = %e, "Wishlist add rejected, reverting");
                self.remove_local(user_key, slug, id);
                Err(e)
            }
        }
    }

    /// Optimistically remove, persist, broadcast, then sync to the backend.
    ///
    /// A backend "not found" rejection counts as success. Any other rejection
    /// restores the entry and is returned to the caller.
    pub async fn remove(&self, user_key: &str, slug: &str, id: Option<i64>) -> ClientResult<()> {
        let removed = self.remove_local(user_key, slug, id);

        match self.api.remove_wishlist_entry(slug).await {
            Ok(()) => Ok(()),
            // already gone upstream - local state is already correct
            Err(ClientError::NotFound(_)) => Ok(()),
            Err(e) => {
                tracing::warn!(user_key, slug, error = %e, "Wishlist remove rejected, restoring");
                {
                    let mut state = self.state.write();
                    state.set.insert(WishlistKey::Slug(slug.to_string()));
                    if let Some(id) = id {
                        state.set.insert(WishlistKey::Id(id));
                    }
                    if let Some(entry) = removed {
                        for key in entry.keys() {
                            state.set.insert(key);
                        }
                        if !state.list.iter().any(|e| e.slug == slug) {
                            state.list.push(entry);
                        }
                    }
                }
                self.persist(user_key);
                self.notify(
                    user_key,
                    WishlistEventKind::Added {
                        slug: slug.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    fn is_fresh(&self, user_key: &str) -> bool {
        let state = self.state.read();
        state.loaded_for.as_deref() == Some(user_key) && !state.list.is_empty()
    }

    /// Invalidate on identity change and (re)seed from storage when the
    /// cache does not yet reflect this user
    fn sync_identity(&self, user_key: &str) {
        let (previous, needs_seed) = {
            let state = self.state.read();
            match state.loaded_for.as_deref() {
                None => (None, true),
                Some(current) if current != user_key => (Some(current.to_string()), true),
                Some(_) => (None, false),
            }
        };
        if !needs_seed {
            return;
        }

        if let Some(previous) = previous {
            {
                let mut state = self.state.write();
                state.loaded_for = None;
                state.status = CacheStatus::Empty;
                state.set.clear();
                state.list.clear();
            }
            tracing::debug!(from = %previous, to = user_key, "Wishlist cache invalidated on identity change");
            self.notify(&previous, WishlistEventKind::Invalidated);
        }
        self.seed_from_storage(user_key);
    }

    /// Remove locally, persist and broadcast; returns the removed entry for
    /// potential restore
    fn remove_local(&self, user_key: &str, slug: &str, id: Option<i64>) -> Option<WishlistEntry> {
        let removed = {
            let mut state = self.state.write();
            state.set.remove(&WishlistKey::Slug(slug.to_string()));
            if let Some(id) = id {
                state.set.remove(&WishlistKey::Id(id));
            }
            let position = state.list.iter().position(|e| e.slug == slug);
            let entry = position.map(|p| state.list.remove(p));
            if let Some(entry) = &entry {
                // drop any extra ids the stored entry registered
                for key in entry.keys() {
                    state.set.remove(&key);
                }
            }
            entry
        };
        self.persist(user_key);
        self.notify(
            user_key,
            WishlistEventKind::Removed {
                slug: slug.to_string(),
            },
        );
        removed
    }

    fn persist(&self, user_key: &str) {
        let (set, list) = {
            let state = self.state.read();
            (
                state.set.iter().cloned().collect::<Vec<_>>(),
                state.list.clone(),
            )
        };
        if let Err(e) = self.storage.store_wishlist(user_key, &set, &list) {
            tracing::error!(user_key, error = %e, "Failed to persist wishlist snapshot");
        }
    }

    fn notify(&self, user_key: &str, kind: WishlistEventKind) {
        let _ = self.event_tx.send(WishlistEvent {
            user_key: user_key.to_string(),
            kind,
        });
    }
}

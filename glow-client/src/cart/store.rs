//! CartStore - cart mutations and promotion-driven gift reconciliation
//!
//! # Mutation flow
//!
//! ```text
//! add_item / remove_item / increase_quantity / decrease_quantity
//!     ├─ 1. Mutate the real lines under the state lock, bump the generation
//!     ├─ 2. Persist the full snapshot (log-and-continue on failure)
//!     ├─ 3. Broadcast CartEvent::Updated
//!     └─ 4. Run a generation-stamped reconciliation pass
//! ```
//!
//! # Reconciliation policy
//!
//! Every mutation stamps its own pass with the generation it produced; a
//! pass commits only if that generation is still current, so a stale pass is
//! discarded instead of overwriting newer state. Output is always a full
//! replacement of the gift set and discount overrides, never a patch. A
//! failed promotion fetch degrades to "no gifts" - real lines are never
//! touched by a failure.

use crate::api::StorefrontApi;
use crate::cart::identity::is_same_line;
use crate::cart::reconcile;
use crate::pricing::calculator::{self, CartTotals};
use crate::storage::SnapshotStorage;
use parking_lot::RwLock;
use shared::{CartItemDraft, CartLineItem, ItemOption, VariantDisplay};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Cart change channel capacity
const CART_CHANNEL_CAPACITY: usize = 64;

/// Cart change notification
#[derive(Debug, Clone)]
pub enum CartEvent {
    /// Lines changed; carries the full current list (real + gifts)
    Updated { items: Vec<CartLineItem> },
}

#[derive(Debug, Default)]
struct CartState {
    real: Vec<CartLineItem>,
    gifts: Vec<CartLineItem>,
}

impl CartState {
    fn all_items(&self) -> Vec<CartLineItem> {
        self.real.iter().chain(self.gifts.iter()).cloned().collect()
    }
}

/// Cart store: real purchase lines plus derived gift lines
pub struct CartStore {
    api: Arc<dyn StorefrontApi>,
    storage: SnapshotStorage,
    state: Arc<RwLock<CartState>>,
    event_tx: broadcast::Sender<CartEvent>,
    /// Bumped by every mutation; stale reconciliation passes discard their output
    generation: AtomicU64,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("CartStore")
            .field("real_lines", &state.real.len())
            .field("gift_lines", &state.gifts.len())
            .finish()
    }
}

impl CartStore {
    /// Restore the cart from the persisted snapshot, falling back to empty
    pub fn new(api: Arc<dyn StorefrontApi>, storage: SnapshotStorage) -> Self {
        let snapshot = match storage.load_cart() {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to restore cart snapshot, starting empty");
                Vec::new()
            }
        };
        let (real, gifts) = snapshot.into_iter().partition(|item: &CartLineItem| !item.is_gift);

        let (event_tx, _) = broadcast::channel(CART_CHANNEL_CAPACITY);
        Self {
            api,
            storage,
            state: Arc::new(RwLock::new(CartState { real, gifts })),
            event_tx,
            generation: AtomicU64::new(0),
        }
    }

    /// Subscribe to cart change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.event_tx.subscribe()
    }

    /// Current line list: real lines followed by gifts
    pub fn items(&self) -> Vec<CartLineItem> {
        self.state.read().all_items()
    }

    /// Totals over effective unit prices
    pub fn totals(&self) -> CartTotals {
        calculator::cart_totals(&self.items())
    }

    /// Add a line, merging into an existing real line with the same variant
    /// and options. A merged entry keeps its price and display metadata; only
    /// the quantity grows. Gift lines never participate in the merge.
    pub async fn add_item(&self, draft: CartItemDraft) {
        let incoming = draft.into_line();
        let generation = self.mutate(|state| {
            if let Some(existing) = state
                .real
                .iter_mut()
                .find(|line| is_same_line(incoming.variant_id, &incoming.options, line))
            {
                existing.quantity += incoming.quantity;
            } else {
                state.real.push(incoming);
            }
        });
        self.after_mutation(generation).await;
    }

    /// Remove the matching real line entirely. No-op when absent. Gift lines
    /// are not user-removable; they disappear when their promotion no longer
    /// applies.
    pub async fn remove_item(&self, variant_id: i64, options: &[ItemOption]) {
        let generation = self.mutate(|state| {
            state
                .real
                .retain(|line| !is_same_line(variant_id, options, line));
        });
        self.after_mutation(generation).await;
    }

    /// Increment the matching real line's quantity by one
    pub async fn increase_quantity(&self, variant_id: i64, options: &[ItemOption]) {
        let generation = self.mutate(|state| {
            if let Some(line) = state
                .real
                .iter_mut()
                .find(|line| is_same_line(variant_id, options, line))
            {
                line.quantity += 1;
            }
        });
        self.after_mutation(generation).await;
    }

    /// Decrement the matching real line's quantity by one, floored at 1.
    /// Removal is a separate explicit action.
    pub async fn decrease_quantity(&self, variant_id: i64, options: &[ItemOption]) {
        let generation = self.mutate(|state| {
            if let Some(line) = state
                .real
                .iter_mut()
                .find(|line| is_same_line(variant_id, options, line))
                && line.quantity > 1
            {
                line.quantity -= 1;
            }
        });
        self.after_mutation(generation).await;
    }

    /// Re-derive gift lines and discount overrides from current promotions.
    ///
    /// Runs automatically after every mutation; call directly to refresh
    /// after an external promotion change. Idempotent: repeated passes over
    /// unchanged inputs produce an identical gift set.
    pub async fn reconcile_gifts(&self) {
        let generation = self.generation.load(Ordering::SeqCst);
        self.reconcile(generation).await;
    }

    fn mutate<F: FnOnce(&mut CartState)>(&self, apply: F) -> u64 {
        let mut state = self.state.write();
        apply(&mut state);
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn after_mutation(&self, generation: u64) {
        self.persist_and_notify();
        self.reconcile(generation).await;
    }

    async fn reconcile(&self, generation: u64) {
        let real_snapshot: Vec<CartLineItem> = self.state.read().real.clone();
        let now_millis = chrono::Utc::now().timestamp_millis();

        let promotions = match self.api.fetch_active_promotions().await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(error = %e, "Promotion fetch failed, dropping gift lines");
                // fall back to base prices as well - no stale promotion state
                let cleared = vec![None; real_snapshot.len()];
                self.commit_reconciliation(generation, Vec::new(), cleared);
                return;
            }
        };

        let overrides = reconcile::discount_overrides(&real_snapshot, &promotions, now_millis);
        let plan = reconcile::gift_plan(&real_snapshot, &promotions, now_millis);

        let mut gifts = Vec::with_capacity(plan.len());
        for grant in plan {
            match self.api.fetch_variant_display(grant.variant_id).await {
                Ok(display) => gifts.push(gift_line(&display, grant.quantity)),
                Err(e) => {
                    tracing::warn!(
                        variant_id = grant.variant_id,
                        error = %e,
                        "Gift variant lookup failed, skipping grant"
                    );
                }
            }
        }

        self.commit_reconciliation(generation, gifts, overrides);
    }

    /// Full-replacement commit, discarded when a newer mutation landed while
    /// this pass was in flight (that mutation runs its own pass).
    fn commit_reconciliation(
        &self,
        generation: u64,
        gifts: Vec<CartLineItem>,
        overrides: Vec<Option<f64>>,
    ) {
        {
            let mut state = self.state.write();
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "Discarding stale reconciliation result");
                return;
            }
            // the length differs only when the pass raced a mutation that the
            // generation check did not catch; skip the overrides in that case
            if overrides.len() == state.real.len() {
                for (line, price) in state.real.iter_mut().zip(overrides) {
                    line.final_discount_price = price;
                }
            }
            state.gifts = gifts;
        }
        self.persist_and_notify();
    }

    fn persist_and_notify(&self) {
        let items = self.items();
        if let Err(e) = self.storage.store_cart(&items) {
            tracing::error!(error = %e, "Failed to persist cart snapshot");
        }
        let _ = self.event_tx.send(CartEvent::Updated { items });
    }
}

fn gift_line(display: &VariantDisplay, quantity: u32) -> CartLineItem {
    CartLineItem {
        product_id: display.product_id,
        variant_id: display.variant_id,
        name: display.name.clone(),
        image: display.image.clone(),
        price: 0.0,
        original_price: display.original_price,
        quantity,
        options: Vec::new(),
        is_gift: true,
        sale_discount_price: None,
        final_discount_price: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, ClientResult};
    use async_trait::async_trait;
    use shared::Promotion;
    use std::collections::HashMap;

    /// Backend with no promotions and no variants
    struct NullApi;

    #[async_trait]
    impl StorefrontApi for NullApi {
        async fn fetch_active_promotions(&self) -> ClientResult<HashMap<String, Promotion>> {
            Ok(HashMap::new())
        }

        async fn fetch_variant_display(&self, variant_id: i64) -> ClientResult<VariantDisplay> {
            Err(ClientError::NotFound(format!("variant {}", variant_id)))
        }

        async fn fetch_wishlist(&self, _user_key: &str) -> ClientResult<Vec<shared::WishlistEntry>> {
            Ok(Vec::new())
        }

        async fn add_wishlist_entry(&self, _slug: &str) -> ClientResult<()> {
            Ok(())
        }

        async fn remove_wishlist_entry(&self, _slug: &str) -> ClientResult<()> {
            Ok(())
        }
    }

    fn make_store() -> CartStore {
        CartStore::new(
            Arc::new(NullApi),
            SnapshotStorage::open_in_memory().unwrap(),
        )
    }

    fn make_draft(variant_id: i64, quantity: u32, options: Vec<ItemOption>) -> CartItemDraft {
        CartItemDraft {
            product_id: 1,
            variant_id,
            name: format!("variant-{}", variant_id),
            image: String::new(),
            price: 100_000.0,
            original_price: 120_000.0,
            quantity,
            options,
            sale_discount_price: None,
        }
    }

    #[tokio::test]
    async fn test_add_merges_same_variant_and_options() {
        let store = make_store();
        store
            .add_item(make_draft(10, 2, vec![ItemOption::new("size", "M")]))
            .await;
        store
            .add_item(make_draft(10, 1, vec![ItemOption::new("size", "M")]))
            .await;

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_merge_is_option_order_insensitive() {
        let store = make_store();
        store
            .add_item(make_draft(
                10,
                1,
                vec![ItemOption::new("size", "M"), ItemOption::new("shade", "rose")],
            ))
            .await;
        store
            .add_item(make_draft(
                10,
                2,
                vec![ItemOption::new("shade", "rose"), ItemOption::new("size", "M")],
            ))
            .await;

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_merge_preserves_existing_price() {
        let store = make_store();
        store.add_item(make_draft(10, 1, Vec::new())).await;

        let mut repriced = make_draft(10, 1, Vec::new());
        repriced.price = 999_999.0;
        store.add_item(repriced).await;

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price, 100_000.0);
    }

    #[tokio::test]
    async fn test_different_options_stay_separate() {
        let store = make_store();
        store
            .add_item(make_draft(10, 1, vec![ItemOption::new("size", "M")]))
            .await;
        store
            .add_item(make_draft(10, 1, vec![ItemOption::new("size", "L")]))
            .await;

        assert_eq!(store.items().len(), 2);
    }

    #[tokio::test]
    async fn test_decrease_floors_at_one() {
        let store = make_store();
        store.add_item(make_draft(10, 1, Vec::new())).await;

        store.decrease_quantity(10, &[]).await;
        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_increase_and_decrease() {
        let store = make_store();
        store.add_item(make_draft(10, 1, Vec::new())).await;

        store.increase_quantity(10, &[]).await;
        store.increase_quantity(10, &[]).await;
        assert_eq!(store.items()[0].quantity, 3);

        store.decrease_quantity(10, &[]).await;
        assert_eq!(store.items()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_remove_is_noop_when_absent() {
        let store = make_store();
        store.add_item(make_draft(10, 1, Vec::new())).await;

        store.remove_item(99, &[]).await;
        assert_eq!(store.items().len(), 1);

        store.remove_item(10, &[]).await;
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_restores_on_reopen() {
        let storage = SnapshotStorage::open_in_memory().unwrap();
        {
            let store = CartStore::new(Arc::new(NullApi), storage.clone());
            store.add_item(make_draft(10, 2, Vec::new())).await;
        }

        let reopened = CartStore::new(Arc::new(NullApi), storage);
        let items = reopened.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }
}

//! Shared test backend
//!
//! An in-process `StorefrontApi` with scriptable promotions, variants and
//! per-user wishlists, plus failure switches for the error-path tests.

#![allow(dead_code)]

use async_trait::async_trait;
use glow_client::{
    CartItemDraft, ClientError, ClientResult, DiscountType, ItemOption, Promotion,
    PromotionRule, StorefrontApi, VariantDisplay, WishlistEntry,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

/// Scripted response for wishlist mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationResponse {
    #[default]
    Ok,
    Conflict,
    NotFound,
    Unauthorized,
}

#[derive(Default)]
pub struct MockApi {
    pub promotions: Mutex<HashMap<String, Promotion>>,
    pub variants: Mutex<HashMap<i64, VariantDisplay>>,
    pub wishlists: Mutex<HashMap<String, Vec<WishlistEntry>>>,
    pub fail_promotions: AtomicBool,
    pub fail_wishlist_fetch: AtomicBool,
    pub wishlist_fetch_count: AtomicU32,
    pub wishlist_fetch_delay_ms: AtomicU64,
    pub mutation_response: Mutex<MutationResponse>,
}

impl MockApi {
    pub fn set_promotion(&self, key: &str, promotion: Promotion) {
        self.promotions.lock().insert(key.to_string(), promotion);
    }

    pub fn clear_promotions(&self) {
        self.promotions.lock().clear();
    }

    pub fn set_variant(&self, display: VariantDisplay) {
        self.variants.lock().insert(display.variant_id, display);
    }

    pub fn set_wishlist(&self, user_key: &str, entries: Vec<WishlistEntry>) {
        self.wishlists.lock().insert(user_key.to_string(), entries);
    }

    pub fn set_mutation_response(&self, response: MutationResponse) {
        *self.mutation_response.lock() = response;
    }

    fn mutation_result(&self) -> ClientResult<()> {
        match *self.mutation_response.lock() {
            MutationResponse::Ok => Ok(()),
            MutationResponse::Conflict => Err(ClientError::Conflict("already exists".into())),
            MutationResponse::NotFound => Err(ClientError::NotFound("no such entry".into())),
            MutationResponse::Unauthorized => Err(ClientError::Unauthorized),
        }
    }
}

#[async_trait]
impl StorefrontApi for MockApi {
    async fn fetch_active_promotions(&self) -> ClientResult<HashMap<String, Promotion>> {
        if self.fail_promotions.load(Ordering::SeqCst) {
            return Err(ClientError::Internal("promotions unavailable".into()));
        }
        Ok(self.promotions.lock().clone())
    }

    async fn fetch_variant_display(&self, variant_id: i64) -> ClientResult<VariantDisplay> {
        self.variants
            .lock()
            .get(&variant_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("variant {}", variant_id)))
    }

    async fn fetch_wishlist(&self, user_key: &str) -> ClientResult<Vec<WishlistEntry>> {
        self.wishlist_fetch_count.fetch_add(1, Ordering::SeqCst);
        let delay = self.wishlist_fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
        if self.fail_wishlist_fetch.load(Ordering::SeqCst) {
            return Err(ClientError::Unauthorized);
        }
        Ok(self
            .wishlists
            .lock()
            .get(user_key)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_wishlist_entry(&self, _slug: &str) -> ClientResult<()> {
        self.mutation_result()
    }

    async fn remove_wishlist_entry(&self, _slug: &str) -> ClientResult<()> {
        self.mutation_result()
    }
}

// ========== Fixture Helpers ==========

pub fn buy_get(buy: u32, get: u32, gift_variant: i64) -> Promotion {
    Promotion {
        name: format!("buy {} get {}", buy, get),
        is_active: true,
        valid_from: None,
        valid_until: None,
        rule: PromotionRule::BuyGet {
            buy_quantity: buy,
            get_quantity: get,
            gift_product_variant_id: gift_variant,
        },
    }
}

pub fn percent_off(value: f64) -> Promotion {
    Promotion {
        name: format!("{}% off", value),
        is_active: true,
        valid_from: None,
        valid_until: None,
        rule: PromotionRule::Discount {
            discount_type: DiscountType::Percentage,
            value,
        },
    }
}

pub fn display(variant_id: i64, product_id: i64, name: &str, original_price: f64) -> VariantDisplay {
    VariantDisplay {
        variant_id,
        product_id,
        name: name.to_string(),
        image: String::new(),
        original_price,
    }
}

pub fn draft(variant_id: i64, quantity: u32, options: Vec<ItemOption>) -> CartItemDraft {
    CartItemDraft {
        product_id: variant_id / 10,
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

pub fn entry(slug: &str, id: Option<i64>) -> WishlistEntry {
    WishlistEntry::from_keys(slug, id)
}

//! Offline demo: a scripted backend driving the cart and wishlist
//!
//! Run with: `cargo run -p glow-client --example offline_session`

use anyhow::Result;
use async_trait::async_trait;
use glow_client::{
    CartItemDraft, ClientError, ClientResult, DiscountType, ItemOption, Promotion,
    PromotionRule, SnapshotStorage, StorefrontApi, StorefrontSession, VariantDisplay,
    WishlistEntry,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed catalog: one buy-3-get-1 promotion, one 15% discount
struct ScriptedApi;

#[async_trait]
impl StorefrontApi for ScriptedApi {
    async fn fetch_active_promotions(&self) -> ClientResult<HashMap<String, Promotion>> {
        let mut promotions = HashMap::new();
        promotions.insert(
            "variant_10".to_string(),
            Promotion {
                name: "Buy 3 get 1 mini".to_string(),
                is_active: true,
                valid_from: None,
                valid_until: None,
                rule: PromotionRule::BuyGet {
                    buy_quantity: 3,
                    get_quantity: 1,
                    gift_product_variant_id: 55,
                },
            },
        );
        promotions.insert(
            "variant_20".to_string(),
            Promotion {
                name: "15% off cleanser".to_string(),
                is_active: true,
                valid_from: None,
                valid_until: None,
                rule: PromotionRule::Discount {
                    discount_type: DiscountType::Percentage,
                    value: 15.0,
                },
            },
        );
        Ok(promotions)
    }

    async fn fetch_variant_display(&self, variant_id: i64) -> ClientResult<VariantDisplay> {
        match variant_id {
            55 => Ok(VariantDisplay {
                variant_id: 55,
                product_id: 5,
                name: "Mini Serum".to_string(),
                image: String::new(),
                original_price: 50_000.0,
            }),
            _ => Err(ClientError::NotFound(format!("variant {}", variant_id))),
        }
    }

    async fn fetch_wishlist(&self, _user_key: &str) -> ClientResult<Vec<WishlistEntry>> {
        Ok(vec![WishlistEntry::from_keys("serum-x", Some(42))])
    }

    async fn add_wishlist_entry(&self, _slug: &str) -> ClientResult<()> {
        Ok(())
    }

    async fn remove_wishlist_entry(&self, _slug: &str) -> ClientResult<()> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let session =
        StorefrontSession::with_parts(Arc::new(ScriptedApi), SnapshotStorage::open_in_memory()?);

    session
        .cart
        .add_item(CartItemDraft {
            product_id: 1,
            variant_id: 10,
            name: "Serum X".to_string(),
            image: String::new(),
            price: 100_000.0,
            original_price: 120_000.0,
            quantity: 5,
            options: vec![ItemOption::new("size", "30ml")],
            sale_discount_price: None,
        })
        .await;
    session
        .cart
        .add_item(CartItemDraft {
            product_id: 2,
            variant_id: 20,
            name: "Cleanser".to_string(),
            image: String::new(),
            price: 80_000.0,
            original_price: 80_000.0,
            quantity: 1,
            options: Vec::new(),
            sale_discount_price: None,
        })
        .await;

    for item in session.cart.items() {
        println!(
            "{:<12} x{}  unit {:>9.0}  {}",
            item.name,
            item.quantity,
            item.unit_price(),
            if item.is_gift { "(gift)" } else { "" }
        );
    }
    let totals = session.cart.totals();
    println!(
        "payable {:.0}, savings {:.0} across {} units",
        totals.payable, totals.savings, totals.item_count
    );

    session.wishlist.ensure_loaded("demo@example.com").await;
    println!(
        "wishlisted serum-x: {}",
        session.wishlist.has(Some("serum-x"), None)
    );

    Ok(())
}

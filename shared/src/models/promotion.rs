//! Promotion model
//!
//! Promotions arrive as a map keyed by `variant_<id>` or `product_<id>`.
//! The `conditions` object varies by `type`: `buy_get` grants gift units,
//! `discount` overrides the unit price.

use serde::{Deserialize, Serialize};

/// Map key for a variant-scoped promotion
pub fn variant_key(variant_id: i64) -> String {
    format!("variant_{}", variant_id)
}

/// Map key for a product-scoped promotion
pub fn product_key(product_id: i64) -> String {
    format!("product_{}", product_id)
}

/// Discount type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

/// Promotion conditions, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "conditions", rename_all = "snake_case")]
pub enum PromotionRule {
    /// Buy `buy_quantity` units, get `get_quantity` units of the gift variant
    #[serde(rename_all = "camelCase")]
    BuyGet {
        buy_quantity: u32,
        get_quantity: u32,
        gift_product_variant_id: i64,
    },
    /// Direct price adjustment on the matched line
    #[serde(rename_all = "camelCase")]
    Discount {
        discount_type: DiscountType,
        value: f64,
    },
}

/// Promotion entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promotion {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Valid from datetime (Unix millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<i64>,
    /// Valid until datetime (Unix millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<i64>,
    #[serde(flatten)]
    pub rule: PromotionRule,
}

fn default_true() -> bool {
    true
}

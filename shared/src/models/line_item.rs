//! Cart line item models

use serde::{Deserialize, Serialize};

/// A chosen option on a line item (e.g. shade, size)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemOption {
    pub name: String,
    pub value: String,
}

impl ItemOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Cart line item - the full snapshot that is persisted and rendered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// Product ID
    pub product_id: i64,
    /// Variant ID - the purchasable unit
    pub variant_id: i64,
    /// Product name, denormalized at add time
    pub name: String,
    /// Image URL, denormalized at add time
    #[serde(default)]
    pub image: String,
    /// Effective unit price charged
    pub price: f64,
    /// Pre-discount unit price, for savings display
    pub original_price: f64,
    /// Quantity (at least 1 for real items)
    pub quantity: u32,
    /// Selected options; with `variant_id` they form the merge identity
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ItemOption>,
    /// True for promotion-injected lines
    #[serde(default)]
    pub is_gift: bool,
    /// Sale override captured at add time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_discount_price: Option<f64>,
    /// Promotion override computed during gift reconciliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_discount_price: Option<f64>,
}

impl CartLineItem {
    /// Effective charged unit price: promotion override wins over the sale
    /// override, which wins over the base price.
    pub fn unit_price(&self) -> f64 {
        self.final_discount_price
            .or(self.sale_discount_price)
            .unwrap_or(self.price)
    }
}

/// Add-time input for a line item.
///
/// The store owns `is_gift` and `final_discount_price`, so they are not part
/// of the input shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemDraft {
    pub product_id: i64,
    pub variant_id: i64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    pub original_price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ItemOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_discount_price: Option<f64>,
}

impl CartItemDraft {
    /// Convert into a real (non-gift) line, clamping quantity to at least 1
    pub fn into_line(self) -> CartLineItem {
        CartLineItem {
            product_id: self.product_id,
            variant_id: self.variant_id,
            name: self.name,
            image: self.image,
            price: self.price,
            original_price: self.original_price,
            quantity: self.quantity.max(1),
            options: self.options,
            is_gift: false,
            sale_discount_price: self.sale_discount_price,
            final_discount_price: None,
        }
    }
}

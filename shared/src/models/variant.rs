//! Variant display lookup result

use serde::{Deserialize, Serialize};

/// Display metadata for a variant, resolved when a gift line is injected
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantDisplay {
    pub variant_id: i64,
    pub product_id: i64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub original_price: f64,
}

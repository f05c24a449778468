//! Line identity for merge decisions
//!
//! Two lines are the same purchasable unit when their variant and chosen
//! options match. The option signature is order-insensitive (sorted by
//! option name), so call sites that build the option list in different
//! orders still merge.

use shared::{CartLineItem, ItemOption};

/// Stable signature for an option set: sorted `name=value` pairs
pub(crate) fn options_signature(options: &[ItemOption]) -> String {
    let mut pairs: Vec<(&str, &str)> = options
        .iter()
        .map(|o| (o.name.as_str(), o.value.as_str()))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(";")
}

/// Whether a line matches the given `(variant_id, options)` identity
pub(crate) fn is_same_line(variant_id: i64, options: &[ItemOption], line: &CartLineItem) -> bool {
    line.variant_id == variant_id && options_signature(&line.options) == options_signature(options)
}

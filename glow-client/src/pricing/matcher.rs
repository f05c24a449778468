//! Promotion matcher
//!
//! Finds the promotion applying to a cart line. The `variant_<id>` key takes
//! precedence over `product_<id>`; inactive promotions and promotions outside
//! their validity window never match.

use shared::models::promotion::{product_key, variant_key};
use shared::Promotion;
use std::collections::HashMap;

/// Check whether a promotion is currently in effect
pub fn is_in_effect(promotion: &Promotion, now_millis: i64) -> bool {
    if !promotion.is_active {
        return false;
    }
    if let Some(from) = promotion.valid_from
        && now_millis < from
    {
        return false;
    }
    if let Some(until) = promotion.valid_until
        && now_millis > until
    {
        return false;
    }
    true
}

/// Look up the promotion applying to a line, variant key first
pub fn promotion_for_line<'a>(
    promotions: &'a HashMap<String, Promotion>,
    variant_id: i64,
    product_id: i64,
    now_millis: i64,
) -> Option<&'a Promotion> {
    promotions
        .get(&variant_key(variant_id))
        .filter(|p| is_in_effect(p, now_millis))
        .or_else(|| {
            promotions
                .get(&product_key(product_id))
                .filter(|p| is_in_effect(p, now_millis))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::promotion::{DiscountType, PromotionRule};

    const NOW: i64 = 1_700_000_000_000;

    fn make_promotion(name: &str) -> Promotion {
        Promotion {
            name: name.to_string(),
            is_active: true,
            valid_from: None,
            valid_until: None,
            rule: PromotionRule::Discount {
                discount_type: DiscountType::Percentage,
                value: 10.0,
            },
        }
    }

    #[test]
    fn test_variant_key_takes_precedence() {
        let mut promotions = HashMap::new();
        promotions.insert("variant_10".to_string(), make_promotion("by-variant"));
        promotions.insert("product_1".to_string(), make_promotion("by-product"));

        let matched = promotion_for_line(&promotions, 10, 1, NOW).unwrap();
        assert_eq!(matched.name, "by-variant");
    }

    #[test]
    fn test_falls_back_to_product_key() {
        let mut promotions = HashMap::new();
        promotions.insert("product_1".to_string(), make_promotion("by-product"));

        let matched = promotion_for_line(&promotions, 10, 1, NOW).unwrap();
        assert_eq!(matched.name, "by-product");
        assert!(promotion_for_line(&promotions, 10, 2, NOW).is_none());
    }

    #[test]
    fn test_inactive_variant_promotion_falls_through() {
        let mut inactive = make_promotion("by-variant");
        inactive.is_active = false;
        let mut promotions = HashMap::new();
        promotions.insert("variant_10".to_string(), inactive);
        promotions.insert("product_1".to_string(), make_promotion("by-product"));

        let matched = promotion_for_line(&promotions, 10, 1, NOW).unwrap();
        assert_eq!(matched.name, "by-product");
    }

    #[test]
    fn test_validity_window() {
        let mut promotion = make_promotion("flash");
        promotion.valid_from = Some(NOW - 1_000);
        promotion.valid_until = Some(NOW + 1_000);
        assert!(is_in_effect(&promotion, NOW));
        assert!(!is_in_effect(&promotion, NOW - 2_000));
        assert!(!is_in_effect(&promotion, NOW + 2_000));
    }
}

//! Gift and discount derivation from the current promotion map
//!
//! Reconciliation output is a pure function of the real lines and the
//! promotion map, so a pass can be recomputed at any time and replace the
//! previous gift set wholesale.

use crate::pricing::{calculator, matcher};
use shared::models::promotion::PromotionRule;
use shared::{CartLineItem, Promotion};
use std::collections::HashMap;

/// One pending gift: the variant to grant and the total units
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GiftGrant {
    pub variant_id: i64,
    pub quantity: u32,
}

/// Derive gift grants for the current real lines.
///
/// Grants to the same gift variant aggregate into a single entry, in
/// first-occurrence order, so the gift set never contains duplicate lines.
pub(crate) fn gift_plan(
    real: &[CartLineItem],
    promotions: &HashMap<String, Promotion>,
    now_millis: i64,
) -> Vec<GiftGrant> {
    let mut grants: Vec<GiftGrant> = Vec::new();

    for line in real {
        let Some(promotion) =
            matcher::promotion_for_line(promotions, line.variant_id, line.product_id, now_millis)
        else {
            continue;
        };
        let PromotionRule::BuyGet {
            buy_quantity,
            get_quantity,
            gift_product_variant_id,
        } = &promotion.rule
        else {
            continue;
        };

        let units = calculator::gift_units(line.quantity, *buy_quantity, *get_quantity);
        if units == 0 {
            continue;
        }

        if let Some(grant) = grants
            .iter_mut()
            .find(|g| g.variant_id == *gift_product_variant_id)
        {
            grant.quantity += units;
        } else {
            grants.push(GiftGrant {
                variant_id: *gift_product_variant_id,
                quantity: units,
            });
        }
    }

    grants
}

/// Recompute the discount override for every real line.
///
/// Returns one `final_discount_price` per line, positionally; `None` clears
/// a previously applied override. The base for the discount is the
/// sale-effective price (sale override if present, else the base price).
pub(crate) fn discount_overrides(
    real: &[CartLineItem],
    promotions: &HashMap<String, Promotion>,
    now_millis: i64,
) -> Vec<Option<f64>> {
    real.iter()
        .map(|line| {
            let promotion = matcher::promotion_for_line(
                promotions,
                line.variant_id,
                line.product_id,
                now_millis,
            )?;
            match &promotion.rule {
                PromotionRule::Discount {
                    discount_type,
                    value,
                } => {
                    let base = line.sale_discount_price.unwrap_or(line.price);
                    Some(calculator::discounted_price(base, *discount_type, *value))
                }
                _ => None,
            }
        })
        .collect()
}

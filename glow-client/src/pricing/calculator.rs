//! Gift and discount math
//!
//! Calculations run on `Decimal` internally and convert to `f64` at the
//! edges, rounded to 2 decimal places half-up.

use rust_decimal::prelude::*;
use shared::models::promotion::DiscountType;
use shared::CartLineItem;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub(crate) fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub(crate) fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Gift units granted by a buy_get promotion at the given real quantity:
/// `floor(quantity / buy_quantity) * get_quantity`, zero below the threshold
pub fn gift_units(quantity: u32, buy_quantity: u32, get_quantity: u32) -> u32 {
    if buy_quantity == 0 || quantity < buy_quantity {
        return 0;
    }
    (quantity / buy_quantity) * get_quantity
}

/// Discounted unit price for a discount promotion. Never goes below zero.
pub fn discounted_price(base: f64, discount_type: DiscountType, value: f64) -> f64 {
    let base = to_decimal(base);
    let value = to_decimal(value);
    let result = match discount_type {
        DiscountType::Percentage => base * (Decimal::ONE - value / Decimal::ONE_HUNDRED),
        DiscountType::FixedAmount => base - value,
    };
    to_f64(result.max(Decimal::ZERO))
}

/// Cart totals derived from effective unit prices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartTotals {
    /// Real units in the cart (gift units excluded)
    pub item_count: u32,
    /// Amount payable at effective unit prices
    pub payable: f64,
    /// Savings vs original prices, gift value included
    pub savings: f64,
}

/// Compute totals over the full line list (real + gifts)
pub fn cart_totals(items: &[CartLineItem]) -> CartTotals {
    let mut item_count = 0u32;
    let mut payable = Decimal::ZERO;
    let mut original = Decimal::ZERO;

    for item in items {
        let quantity = Decimal::from(item.quantity);
        original += to_decimal(item.original_price) * quantity;
        if item.is_gift {
            // Charged nothing; full original value counts as savings
            continue;
        }
        item_count += item.quantity;
        payable += to_decimal(item.unit_price()) * quantity;
    }

    CartTotals {
        item_count,
        payable: to_f64(payable),
        savings: to_f64((original - payable).max(Decimal::ZERO)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_line(quantity: u32, price: f64, original_price: f64, is_gift: bool) -> CartLineItem {
        CartLineItem {
            product_id: 1,
            variant_id: 10,
            name: "Serum X".to_string(),
            image: String::new(),
            price,
            original_price,
            quantity,
            options: Vec::new(),
            is_gift,
            sale_discount_price: None,
            final_discount_price: None,
        }
    }

    #[test]
    fn test_gift_units_threshold() {
        // buy 3 get 1
        assert_eq!(gift_units(2, 3, 1), 0);
        assert_eq!(gift_units(3, 3, 1), 1);
        assert_eq!(gift_units(5, 3, 1), 1);
        assert_eq!(gift_units(6, 3, 1), 2);
        // buy 2 get 3
        assert_eq!(gift_units(5, 2, 3), 6);
    }

    #[test]
    fn test_gift_units_zero_buy_quantity() {
        assert_eq!(gift_units(10, 0, 1), 0);
    }

    #[test]
    fn test_percentage_discount() {
        assert_eq!(
            discounted_price(100_000.0, DiscountType::Percentage, 15.0),
            85_000.0
        );
    }

    #[test]
    fn test_fixed_discount_floors_at_zero() {
        assert_eq!(
            discounted_price(100_000.0, DiscountType::FixedAmount, 30_000.0),
            70_000.0
        );
        assert_eq!(
            discounted_price(20_000.0, DiscountType::FixedAmount, 30_000.0),
            0.0
        );
    }

    #[test]
    fn test_percentage_rounding() {
        // 33% off 99.99 = 66.9933 -> 66.99
        assert_eq!(discounted_price(99.99, DiscountType::Percentage, 33.0), 66.99);
    }

    #[test]
    fn test_totals_count_gift_value_as_savings() {
        let real = make_line(2, 100_000.0, 120_000.0, false);
        let gift = make_line(1, 0.0, 50_000.0, true);
        let totals = cart_totals(&[real, gift]);

        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.payable, 200_000.0);
        // (2 * 120k + 50k) - 200k = 90k
        assert_eq!(totals.savings, 90_000.0);
    }

    #[test]
    fn test_totals_use_effective_unit_price() {
        let mut line = make_line(1, 100_000.0, 100_000.0, false);
        line.final_discount_price = Some(80_000.0);
        let totals = cart_totals(&[line]);
        assert_eq!(totals.payable, 80_000.0);
        assert_eq!(totals.savings, 20_000.0);
    }
}

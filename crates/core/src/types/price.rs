//! Order pricing using decimal arithmetic.
//!
//! Prices are `rust_decimal::Decimal` end to end so that totals never pick up
//! binary floating point error. They are rendered as JSON numbers at the edge.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One order line joined with the current unit price of its product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct PricedLine {
    /// Price of a single unit, read from the product at pricing time.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub unit_price: Decimal,
    /// Number of units on the line.
    pub quantity: i32,
}

impl PricedLine {
    /// Create a priced line.
    #[must_use]
    pub const fn new(unit_price: Decimal, quantity: i32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// `unit_price * quantity`, or `None` if the product does not fit in a `Decimal`.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sum `unit_price * quantity` over every line of an order.
///
/// An order with no lines totals zero. Returns `None` when a subtotal or the
/// running sum leaves the representable `Decimal` range.
#[must_use]
pub fn order_total<'a>(lines: impl IntoIterator<Item = &'a PricedLine>) -> Option<Decimal> {
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.subtotal()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_order_totals_zero() {
        assert_eq!(order_total(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_total_sums_line_subtotals() {
        let lines = [
            PricedLine::new(Decimal::new(1999, 2), 2),
            PricedLine::new(Decimal::new(550, 2), 3),
        ];
        // 39.98 + 16.50
        assert_eq!(order_total(&lines), Some(Decimal::new(5648, 2)));
    }

    #[test]
    fn test_zero_quantity_line_contributes_nothing() {
        let lines = [
            PricedLine::new(Decimal::new(1000, 2), 0),
            PricedLine::new(Decimal::new(250, 2), 4),
        ];
        assert_eq!(order_total(&lines), Some(Decimal::new(10, 0)));
    }

    #[test]
    fn test_subtotal_out_of_range_is_none() {
        let line = PricedLine::new(Decimal::MAX, 2);
        assert_eq!(line.subtotal(), None);
        assert_eq!(order_total(&[line]), None);
    }

    #[test]
    fn test_sum_out_of_range_is_none() {
        // Each subtotal fits on its own; their sum does not.
        let lines = [
            PricedLine::new(Decimal::MAX, 1),
            PricedLine::new(Decimal::ONE, 1),
        ];
        assert_eq!(lines[0].subtotal(), Some(Decimal::MAX));
        assert_eq!(order_total(&lines), None);
    }
}

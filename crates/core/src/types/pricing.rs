//! Order pricing math.
//!
//! Prices are `rust_decimal::Decimal` end-to-end. Totals are computed once at
//! order placement from the cart snapshot and stored unrounded; rounding to
//! two decimal places happens only when a total is presented to a client.

use rust_decimal::Decimal;
use serde::Serialize;

/// Flat delivery fee, in currency units, applied to every order.
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Tax rate applied to the item subtotal (5%).
const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// A cart line with its live menu price, as read by the cart snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    /// Unit price at snapshot time.
    pub price: Decimal,
    /// Quantity ordered.
    pub quantity: i32,
}

/// The price breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    /// Sum of `price * quantity` over all lines.
    pub subtotal: Decimal,
    /// `subtotal * 5%`.
    pub tax: Decimal,
    /// Flat fee, stored on the order row for earnings aggregation.
    pub delivery_fee: Decimal,
    /// `subtotal + tax + delivery_fee`, unrounded.
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute the totals for a set of priced cart lines.
    #[must_use]
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a PricedLine>,
    {
        let subtotal: Decimal = lines
            .into_iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum();
        let tax = subtotal * TAX_RATE;

        Self {
            subtotal,
            tax,
            delivery_fee: DELIVERY_FEE,
            total: subtotal + tax + DELIVERY_FEE,
        }
    }

    /// Total rounded to two decimal places for presentation.
    #[must_use]
    pub fn total_rounded(&self) -> Decimal {
        self.total.round_dp(2)
    }
}

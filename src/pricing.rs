//! Pricing engine: subtotal, shipping, tax and grand total for a set of
//! (unit price, quantity) lines.
//!
//! All intermediates are exact decimals. Rounding to two places happens
//! exactly once, at the persistence/display boundary via [`Quote::rounded`].

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use utoipa::ToSchema;

/// Orders strictly above this subtotal ship free; at the threshold itself
/// the flat fee still applies.
pub const FREE_SHIPPING_THRESHOLD: Decimal = dec!(500);
pub const FLAT_SHIPPING_FEE: Decimal = dec!(15);
/// Applied to the subtotal only, never to shipping.
pub const TAX_RATE: Decimal = dec!(0.20);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Quote {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

pub fn quote(lines: impl IntoIterator<Item = (Decimal, i32)>) -> Quote {
    let mut subtotal = Decimal::ZERO;
    let mut empty = true;
    for (price, quantity) in lines {
        empty = false;
        subtotal += price * Decimal::from(quantity);
    }
    // An empty cart prices to all zeros; checkout is gated on non-empty
    // carts upstream, so the fee question never arises for it. A cart of
    // zero-quantity lines is NOT empty and pays the flat fee like any
    // other under-threshold subtotal.
    let shipping = if empty || subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    };
    let tax = subtotal * TAX_RATE;
    Quote {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}

impl Quote {
    /// Round every figure to two decimal places, midpoint away from zero,
    /// for persistence or display.
    pub fn rounded(&self) -> Quote {
        let r = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Quote {
            subtotal: r(self.subtotal),
            shipping: r(self.shipping),
            tax: r(self.tax),
            total: r(self.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cart_quotes_all_zeros() {
        let q = quote([]);
        assert_eq!(q.subtotal, Decimal::ZERO);
        assert_eq!(q.shipping, Decimal::ZERO);
        assert_eq!(q.tax, Decimal::ZERO);
        assert_eq!(q.total, Decimal::ZERO);
    }

    #[test]
    fn zero_quantity_lines_still_pay_shipping() {
        // A line set to quantity 0 stays in the cart, so the cart is not
        // empty and the under-threshold fee applies to its zero subtotal.
        let q = quote([(dec!(10), 0)]);
        assert_eq!(q.subtotal, Decimal::ZERO);
        assert_eq!(q.shipping, FLAT_SHIPPING_FEE);
        assert_eq!(q.tax, Decimal::ZERO);
        assert_eq!(q.total, FLAT_SHIPPING_FEE);
    }

    #[test]
    fn example_cart_totals() {
        // 2 x 45.99 + 1 x 12.99 = 104.97, under the threshold.
        let q = quote([(dec!(45.99), 2), (dec!(12.99), 1)]);
        assert_eq!(q.subtotal, dec!(104.97));
        assert_eq!(q.shipping, dec!(15));
        assert_eq!(q.tax, dec!(20.994));
        assert_eq!(q.total, dec!(140.964));
        assert_eq!(q.rounded().total, dec!(140.96));
    }

    #[test]
    fn threshold_is_exclusive() {
        let at = quote([(dec!(500.00), 1)]);
        assert_eq!(at.shipping, FLAT_SHIPPING_FEE);

        let above = quote([(dec!(500.01), 1)]);
        assert_eq!(above.shipping, Decimal::ZERO);
    }

    #[test]
    fn tax_never_applies_to_shipping() {
        let q = quote([(dec!(100), 1)]);
        assert_eq!(q.tax, dec!(20));
        assert_eq!(q.total, dec!(135));
    }

    #[test]
    fn rounded_total_matches_rounding_of_exact_sum() {
        let q = quote([(dec!(3.333), 3), (dec!(0.005), 1)]);
        let expected = (q.subtotal + q.shipping + q.tax)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(q.rounded().total, expected);
    }
}

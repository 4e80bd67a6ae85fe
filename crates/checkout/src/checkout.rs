//! Checkout primitives: payment selection, submission phase, and the pure
//! totals calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;

/// How the shopper pays.
///
/// `Online` is a placeholder: selecting it is valid UI state, but
/// submission reports it as not yet supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentOption {
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
    Online,
}

/// Progress of the order submission state machine.
///
/// `Validating` and `Submitting` are passed through inside a single
/// submission call; `Succeeded` and `Failed` record the outcome of the
/// last attempt until the next one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Monetary summary of a cart projection.
///
/// Kept at full precision; two-decimal rounding happens only when an
/// amount is formatted for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute subtotal, tax, and total for a set of cart lines.
///
/// `tax_rate_percent` is a configuration constant (2 by default), not
/// per-product business logic.
#[must_use]
pub fn order_totals(lines: &[CartLine], tax_rate_percent: Decimal) -> OrderTotals {
    let subtotal: Decimal = lines.iter().map(CartLine::subtotal).sum();
    let tax = subtotal * tax_rate_percent / Decimal::ONE_HUNDRED;
    OrderTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn line(id: &str, offer_price: &str, quantity: u32) -> CartLine {
        CartLine {
            product: product(id, id, "Test", offer_price),
            quantity,
        }
    }

    #[test]
    fn two_units_at_hundred_totals_two_hundred_four() {
        let totals = order_totals(&[line("p1", "100", 2)], dec("2"));

        assert_eq!(totals.subtotal, dec("200"));
        assert_eq!(totals.tax, dec("4"));
        assert_eq!(totals.total, dec("204"));
    }

    #[test]
    fn empty_projection_totals_zero() {
        let totals = order_totals(&[], dec("2"));

        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn tax_keeps_full_precision() {
        // 33.33 * 3 = 99.99; 2% of that is 1.9998, not 2.00.
        let totals = order_totals(&[line("p1", "33.33", 3)], dec("2"));

        assert_eq!(totals.tax, dec("1.9998"));
        assert_eq!(totals.total, dec("101.9898"));
    }

    #[test]
    fn totals_sum_across_lines() {
        let totals = order_totals(&[line("p1", "25.5", 2), line("p2", "40", 1)], dec("2"));

        assert_eq!(totals.subtotal, dec("91"));
        assert_eq!(totals.total, totals.subtotal + totals.tax);
    }

    #[test]
    fn payment_option_serializes_with_wire_labels() {
        assert_eq!(
            serde_json::to_string(&PaymentOption::CashOnDelivery).unwrap(),
            "\"COD\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentOption::Online).unwrap(),
            "\"Online\""
        );
    }
}

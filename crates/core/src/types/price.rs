//! Decimal money helpers.
//!
//! All monetary arithmetic in the workspace uses [`rust_decimal::Decimal`]
//! at full precision. These helpers cover the two places precision is
//! deliberately given up: the cart amount (truncated to whole cents) and
//! display formatting (two decimal places behind a currency symbol).
//!
//! Currency here is only a display label; there is no conversion and no
//! per-currency arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};

/// Truncate an amount to two decimal places, toward zero.
///
/// `100.999` becomes `100.99`, never `101.00`. Sub-cent remainders are
/// dropped, not carried.
#[must_use]
pub fn truncate_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Format an amount for display: currency symbol followed by the amount
/// at exactly two decimal places.
#[must_use]
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    format!("{symbol}{amount:.2}")
}

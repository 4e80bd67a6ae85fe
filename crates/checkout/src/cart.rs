//! Cart store and its catalog projection.
//!
//! The store is the authoritative map from product id to desired quantity
//! for the current session. It knows nothing about products beyond their
//! ids: pricing and display data come from joining against the catalog at
//! read time, so a catalog refresh propagates without any invalidation
//! step. Entries whose product has left the catalog are expected data
//! skew and are skipped, never an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use greenbasket_core::{ProductId, truncate_cents};

use crate::catalog::{Catalog, Product};

/// A display-ready cart line: product snapshot plus quantity.
///
/// Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal at the offer price.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.offer_price * Decimal::from(self.quantity)
    }
}

/// Quantity of each product the shopper intends to buy.
///
/// Entries keep the order in which products were first added. Invariant:
/// no entry carries a zero quantity - decrementing (or setting) to zero
/// removes the entry entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartItems {
    entries: Vec<(ProductId, u32)>,
}

impl CartItems {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Increment the quantity for `id` by one, creating the entry at 1 if
    /// absent. Always succeeds.
    pub fn add(&mut self, id: &ProductId) {
        if let Some(entry) = self.entries.iter_mut().find(|(pid, _)| pid == id) {
            entry.1 += 1;
        } else {
            self.entries.push((id.clone(), 1));
        }
    }

    /// Decrement the quantity for `id` by one, deleting the entry when it
    /// reaches zero. A no-op when the id is absent.
    pub fn remove(&mut self, id: &ProductId) {
        if let Some(pos) = self.entries.iter().position(|(pid, _)| pid == id) {
            match self.entries.get_mut(pos) {
                Some(entry) if entry.1 > 1 => entry.1 -= 1,
                _ => {
                    self.entries.remove(pos);
                }
            }
        }
    }

    /// Set the quantity for `id` directly. A quantity of zero removes the
    /// entry, so the no-zero-quantity invariant holds unconditionally.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.entries.retain(|(pid, _)| pid != id);
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|(pid, _)| pid == id) {
            entry.1 = quantity;
        } else {
            self.entries.push((id.clone(), quantity));
        }
    }

    /// Current quantity for `id`, zero when absent.
    #[must_use]
    pub fn quantity(&self, id: &ProductId) -> u32 {
        self.entries
            .iter()
            .find(|(pid, _)| pid == id)
            .map_or(0, |(_, qty)| *qty)
    }

    /// Total number of items across all entries.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.entries.iter().map(|(_, qty)| qty).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry. Used after a successful order submission.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, u32)> {
        self.entries.iter().map(|(id, qty)| (id, *qty))
    }

    /// Total cart amount at offer prices, truncated to whole cents.
    ///
    /// Entries whose product is no longer in the catalog contribute
    /// nothing.
    #[must_use]
    pub fn amount(&self, catalog: &Catalog) -> Decimal {
        let total: Decimal = self
            .entries
            .iter()
            .filter_map(|(id, qty)| {
                catalog
                    .get(id)
                    .map(|product| product.offer_price * Decimal::from(*qty))
            })
            .sum();
        truncate_cents(total)
    }

    /// Join the cart against the catalog, preserving insertion order and
    /// dropping entries whose product has disappeared.
    ///
    /// Pure derivation: safe to recompute at any time without drift.
    #[must_use]
    pub fn project(&self, catalog: &Catalog) -> Vec<CartLine> {
        self.entries
            .iter()
            .filter_map(|(id, quantity)| {
                catalog.get(id).map(|product| CartLine {
                    product: product.clone(),
                    quantity: *quantity,
                })
            })
            .collect()
    }
}

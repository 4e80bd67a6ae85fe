//! Read-only view of the live product catalog.
//!
//! The catalog is supplied by an external loader at session start and may
//! be replaced wholesale when it refreshes; the engine treats each
//! replacement as a single atomic update and never mutates individual
//! products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use greenbasket_core::ProductId;

/// A catalog product as delivered by the backend.
///
/// `offer_price` is the price actually charged per unit; `price` is the
/// list price shown struck through for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend-issued identifier, stable across catalog refreshes.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Category label, also used for related-product lookups.
    pub category: String,
    /// List price.
    pub price: Decimal,
    /// Authoritative unit price for all monetary computation.
    pub offer_price: Decimal,
    /// Whether the product is currently stocked.
    pub in_stock: bool,
    /// Image URLs, primary first.
    #[serde(default)]
    pub image: Vec<String>,
    /// Description lines.
    #[serde(default)]
    pub description: Vec<String>,
    /// Optional weight label (e.g., "500g").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

/// Ordered, read-only product catalog for the current session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from an ordered product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Replace the entire catalog in one atomic update.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// The first `limit` in-stock products, in catalog order.
    #[must_use]
    pub fn best_sellers(&self, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.in_stock)
            .take(limit)
            .collect()
    }

    /// Up to `limit` products sharing `product`'s category, excluding the
    /// product itself.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }

    /// Case-insensitive product name search.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }
}

//! Cart document model.
//!
//! A cart is an ordered list of `(product reference, quantity)` entries with
//! at most one entry per product. Entries may reference products that no
//! longer exist; those resolve to `null` at read time.

use serde::{Deserialize, Serialize};

use bazaar_core::{CartId, ProductId};

use super::Product;

/// One line of a cart: a product reference and how many units of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: ProductId,
    pub quantity: u32,
}

/// A cart document as stored: product references are not expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub products: Vec<CartEntry>,
}

impl Cart {
    /// A fresh cart with no entries.
    #[must_use]
    pub fn empty(id: CartId) -> Self {
        Self {
            id,
            products: Vec::new(),
        }
    }

    /// Find the entry for a product, if the cart holds one.
    #[must_use]
    pub fn entry_mut(&mut self, product: ProductId) -> Option<&mut CartEntry> {
        self.products.iter_mut().find(|e| e.product == product)
    }

    /// Add one unit of a product, appending a new entry when absent.
    ///
    /// The increment is always exactly one unit per call; the entry for a
    /// given product stays unique. An entry already at `u32::MAX` stays
    /// there rather than wrapping.
    pub fn add_one(&mut self, product: ProductId) {
        if let Some(entry) = self.entry_mut(product) {
            entry.quantity = entry.quantity.saturating_add(1);
        } else {
            self.products.push(CartEntry {
                product,
                quantity: 1,
            });
        }
    }

    /// Drop the entry for a product. No-op when the product is absent.
    pub fn remove(&mut self, product: ProductId) {
        self.products.retain(|e| e.product != product);
    }
}

/// A cart entry with its product reference expanded.
///
/// `product` is `None` when the referenced product no longer exists in the
/// product collection (dangling references are legal).
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEntry {
    pub product: Option<Product>,
    pub quantity: u32,
}

/// A cart whose product references have been expanded into full documents.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCart {
    pub id: CartId,
    pub products: Vec<ResolvedEntry>,
}

impl ResolvedCart {
    /// Total cart value: Σ price × quantity over resolved entries.
    ///
    /// Entries whose product is missing, or whose product has no numeric
    /// price, are skipped.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.products
            .iter()
            .filter_map(|entry| {
                let price = entry.product.as_ref()?.price()?;
                Some(price * f64::from(entry.quantity))
            })
            .sum()
    }
}

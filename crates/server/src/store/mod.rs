//! Document store interfaces and their implementations.
//!
//! Products and carts live in two document collections. The [`ProductStore`]
//! and [`CartStore`] traits abstract over the backing store so handlers and
//! tests can run against [`MemoryStore`] while deployments use the
//! `PostgreSQL`-backed [`PgStore`] (one JSONB document per row).

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use bazaar_core::{CartId, ProductId};

use crate::models::{Cart, CartEntry, Product, ResolvedCart};
use crate::query::{ProductFilter, SortOrder};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A fault inside the backing store.
///
/// Store faults are trapped at the repository call sites, logged, and
/// surfaced to clients as a generic internal error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("data corruption: {0}")]
    Corrupt(String),
}

/// Outcome of a cart mutation that can fail on missing entities.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Cart not found")]
    CartNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Product not found in cart")]
    EntryNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One page of a filtered product query.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<Product>,
    /// Total number of documents matching the filter (across all pages).
    pub total: u64,
}

/// CRUD plus paginated, filtered, sorted query over product documents.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// One page of products matching `filter`, in `sort` order (natural
    /// insertion order when `None`). `page` and `limit` are 1-based and ≥ 1.
    async fn list(
        &self,
        filter: &ProductFilter,
        sort: Option<SortOrder>,
        page: u64,
        limit: u64,
    ) -> Result<ProductPage, StoreError>;

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Insert a new product document with a store-assigned id. The attribute
    /// object is persisted as-is; no validation is applied.
    async fn create(&self, fields: Map<String, Value>) -> Result<Product, StoreError>;

    /// Merge `partial`'s top-level keys onto the document and return the
    /// post-update state, or `None` when the id does not resolve.
    async fn update(&self, id: ProductId, partial: &Value) -> Result<Option<Product>, StoreError>;

    /// Delete a document. Returns `false` when the id does not resolve.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;
}

/// CRUD over cart documents. Carts are created empty and never deleted; only
/// their product list is mutated.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn create(&self) -> Result<Cart, StoreError>;

    async fn get(&self, id: CartId) -> Result<Option<Cart>, StoreError>;

    /// The cart with each product reference expanded into the full product
    /// document (`None` entries for references that no longer resolve).
    async fn get_resolved(&self, id: CartId) -> Result<Option<ResolvedCart>, StoreError>;

    /// Add exactly one unit of `product`, incrementing the existing entry or
    /// appending a fresh one. The product must exist at add time; this is the
    /// only cart operation with a referential check.
    async fn add_product(&self, cart: CartId, product: ProductId) -> Result<Cart, CartError>;

    /// Remove the entry for `product`. A missing entry is a no-op, not an
    /// error.
    async fn remove_product(&self, cart: CartId, product: ProductId) -> Result<Cart, CartError>;

    /// Replace the entire product list. Entries are stored as supplied, with
    /// no existence check against the product collection.
    async fn replace_all(&self, cart: CartId, entries: Vec<CartEntry>) -> Result<Cart, CartError>;

    /// Set the quantity of an existing entry to an absolute value. Zero
    /// removes the entry entirely.
    async fn set_quantity(
        &self,
        cart: CartId,
        product: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartError>;

    /// Empty the product list; the cart document itself persists.
    async fn clear(&self, cart: CartId) -> Result<Cart, CartError>;
}

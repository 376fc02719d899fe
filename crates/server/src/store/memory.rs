//! In-memory document store.
//!
//! Backs the test suite and local development runs. Documents are held in
//! insertion order, matching the natural order of the real store.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use bazaar_core::{CartId, ProductId};

use crate::models::{Cart, CartEntry, Product, ResolvedCart, ResolvedEntry};
use crate::query::{ProductFilter, SortOrder};

use super::{CartError, CartStore, ProductPage, ProductStore, StoreError};

/// In-memory product and cart collections behind a pair of locks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
    carts: RwLock<Vec<Cart>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn products_read(&self) -> RwLockReadGuard<'_, Vec<Product>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn products_write(&self) -> RwLockWriteGuard<'_, Vec<Product>> {
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn carts_read(&self) -> RwLockReadGuard<'_, Vec<Cart>> {
        self.carts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn carts_write(&self) -> RwLockWriteGuard<'_, Vec<Cart>> {
        self.carts.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn find_cart(&self, id: CartId) -> Option<Cart> {
        self.carts_read().iter().find(|c| c.id == id).cloned()
    }

    fn save_cart(&self, cart: Cart) {
        let mut carts = self.carts_write();
        if let Some(slot) = carts.iter_mut().find(|c| c.id == cart.id) {
            *slot = cart;
        } else {
            carts.push(cart);
        }
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(
        &self,
        filter: &ProductFilter,
        sort: Option<SortOrder>,
        page: u64,
        limit: u64,
    ) -> Result<ProductPage, StoreError> {
        let mut matched: Vec<Product> = self
            .products_read()
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        match sort {
            Some(SortOrder::Asc) => matched.sort_by(|a, b| {
                a.price()
                    .unwrap_or(f64::NEG_INFINITY)
                    .total_cmp(&b.price().unwrap_or(f64::NEG_INFINITY))
            }),
            Some(SortOrder::Desc) => matched.sort_by(|a, b| {
                b.price()
                    .unwrap_or(f64::NEG_INFINITY)
                    .total_cmp(&a.price().unwrap_or(f64::NEG_INFINITY))
            }),
            None => {}
        }

        let total = matched.len() as u64;
        let start =
            usize::try_from(page.saturating_sub(1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        let items = matched.into_iter().skip(start).take(take).collect();

        Ok(ProductPage { items, total })
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.products_read().iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<Product, StoreError> {
        let product = Product::new(ProductId::generate(), fields);
        self.products_write().push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: ProductId, partial: &Value) -> Result<Option<Product>, StoreError> {
        let mut products = self.products_write();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.merge(partial);
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut products = self.products_write();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn create(&self) -> Result<Cart, StoreError> {
        let cart = Cart::empty(CartId::generate());
        self.carts_write().push(cart.clone());
        Ok(cart)
    }

    async fn get(&self, id: CartId) -> Result<Option<Cart>, StoreError> {
        Ok(self.find_cart(id))
    }

    async fn get_resolved(&self, id: CartId) -> Result<Option<ResolvedCart>, StoreError> {
        let Some(cart) = self.find_cart(id) else {
            return Ok(None);
        };

        let products = self.products_read();
        let entries = cart
            .products
            .iter()
            .map(|entry| ResolvedEntry {
                product: products.iter().find(|p| p.id == entry.product).cloned(),
                quantity: entry.quantity,
            })
            .collect();

        Ok(Some(ResolvedCart {
            id: cart.id,
            products: entries,
        }))
    }

    async fn add_product(&self, cart: CartId, product: ProductId) -> Result<Cart, CartError> {
        let mut state = self.find_cart(cart).ok_or(CartError::CartNotFound)?;

        // Referential check at add time only
        if !self.products_read().iter().any(|p| p.id == product) {
            return Err(CartError::ProductNotFound);
        }

        state.add_one(product);
        self.save_cart(state.clone());
        Ok(state)
    }

    async fn remove_product(&self, cart: CartId, product: ProductId) -> Result<Cart, CartError> {
        let mut state = self.find_cart(cart).ok_or(CartError::CartNotFound)?;
        state.remove(product);
        self.save_cart(state.clone());
        Ok(state)
    }

    async fn replace_all(&self, cart: CartId, entries: Vec<CartEntry>) -> Result<Cart, CartError> {
        let mut state = self.find_cart(cart).ok_or(CartError::CartNotFound)?;
        state.products = entries;
        self.save_cart(state.clone());
        Ok(state)
    }

    async fn set_quantity(
        &self,
        cart: CartId,
        product: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        let mut state = self.find_cart(cart).ok_or(CartError::CartNotFound)?;

        if quantity == 0 {
            // Setting to zero removes the entry, but only if it exists
            state
                .products
                .iter()
                .position(|e| e.product == product)
                .ok_or(CartError::EntryNotFound)?;
            state.remove(product);
        } else {
            let entry = state.entry_mut(product).ok_or(CartError::EntryNotFound)?;
            entry.quantity = quantity;
        }

        self.save_cart(state.clone());
        Ok(state)
    }

    async fn clear(&self, cart: CartId) -> Result<Cart, CartError> {
        let mut state = self.find_cart(cart).ok_or(CartError::CartNotFound)?;
        state.products.clear();
        self.save_cart(state.clone());
        Ok(state)
    }
}

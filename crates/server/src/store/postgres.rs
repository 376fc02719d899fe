//! `PostgreSQL`-backed document store.
//!
//! Each collection is a `(id uuid, seq bigserial, doc jsonb)` table; `seq`
//! preserves insertion order as the natural sort. Filtering uses JSONB
//! containment (`@>`), which gives the same type-sensitive equality
//! semantics as the in-memory store: a string filter value never matches a
//! numeric attribute.
//!
//! Cart mutations are read-modify-write without optimistic concurrency
//! control: two concurrent additions to the same cart can race and drop an
//! increment. Known limitation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{Map, Value, json};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use bazaar_core::{CartId, ProductId};

use crate::models::{Cart, CartEntry, Product, ResolvedCart, ResolvedEntry};
use crate::query::{ProductFilter, SortOrder};

use super::{CartError, CartStore, ProductPage, ProductStore, StoreError};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Document store over two JSONB collections.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the collection tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS products (
                id UUID PRIMARY KEY,
                seq BIGSERIAL,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS carts (
                id UUID PRIMARY KEY,
                seq BIGSERIAL,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load_cart(&self, id: CartId) -> Result<Option<Cart>, StoreError> {
        let row = sqlx::query("SELECT doc FROM carts WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let doc: Value = row.try_get("doc")?;
        let entries = doc.get("products").cloned().unwrap_or_else(|| json!([]));
        let products: Vec<CartEntry> = serde_json::from_value(entries)
            .map_err(|e| StoreError::Corrupt(format!("invalid cart document {id}: {e}")))?;

        Ok(Some(Cart { id, products }))
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), StoreError> {
        let doc = json!({ "products": cart.products });
        sqlx::query("UPDATE carts SET doc = $2 WHERE id = $1")
            .bind(cart.id.as_uuid())
            .bind(doc)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn product_exists(&self, id: ProductId) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

fn row_to_product(row: &sqlx::postgres::PgRow) -> Result<Product, StoreError> {
    let id: Uuid = row.try_get("id")?;
    let doc: Value = row.try_get("doc")?;
    let fields = doc.as_object().cloned().unwrap_or_default();
    Ok(Product::new(ProductId::new(id), fields))
}

/// Strip the reserved `id` key from a partial update body.
fn sanitize_partial(partial: &Value) -> Map<String, Value> {
    partial.as_object().map_or_else(Map::new, |obj| {
        obj.iter()
            .filter(|(k, _)| k.as_str() != "id")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    })
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list(
        &self,
        filter: &ProductFilter,
        sort: Option<SortOrder>,
        page: u64,
        limit: u64,
    ) -> Result<ProductPage, StoreError> {
        let filter_doc = filter.as_document();

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE doc @> $1")
            .bind(&filter_doc)
            .fetch_one(&self.pool)
            .await?;

        let order_by = match sort {
            Some(SortOrder::Asc) => "ORDER BY (doc->>'price')::numeric ASC NULLS FIRST",
            Some(SortOrder::Desc) => "ORDER BY (doc->>'price')::numeric DESC NULLS LAST",
            None => "ORDER BY seq ASC",
        };
        let sql =
            format!("SELECT id, doc FROM products WHERE doc @> $1 {order_by} LIMIT $2 OFFSET $3");

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.saturating_sub(1).saturating_mul(limit)).unwrap_or(i64::MAX);

        let rows = sqlx::query(&sql)
            .bind(&filter_doc)
            .bind(limit_i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(row_to_product)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProductPage {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("SELECT id, doc FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<Product, StoreError> {
        let product = Product::new(ProductId::generate(), fields);
        sqlx::query("INSERT INTO products (id, doc) VALUES ($1, $2)")
            .bind(product.id.as_uuid())
            .bind(Value::Object(product.fields.clone()))
            .execute(&self.pool)
            .await?;
        Ok(product)
    }

    async fn update(&self, id: ProductId, partial: &Value) -> Result<Option<Product>, StoreError> {
        let patch = Value::Object(sanitize_partial(partial));
        let row = sqlx::query("UPDATE products SET doc = doc || $2 WHERE id = $1 RETURNING id, doc")
            .bind(id.as_uuid())
            .bind(patch)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn create(&self) -> Result<Cart, StoreError> {
        let cart = Cart::empty(CartId::generate());
        sqlx::query("INSERT INTO carts (id, doc) VALUES ($1, $2)")
            .bind(cart.id.as_uuid())
            .bind(json!({ "products": [] }))
            .execute(&self.pool)
            .await?;
        Ok(cart)
    }

    async fn get(&self, id: CartId) -> Result<Option<Cart>, StoreError> {
        self.load_cart(id).await
    }

    async fn get_resolved(&self, id: CartId) -> Result<Option<ResolvedCart>, StoreError> {
        let Some(cart) = self.load_cart(id).await? else {
            return Ok(None);
        };

        let ids: Vec<Uuid> = cart.products.iter().map(|e| e.product.as_uuid()).collect();
        let rows = sqlx::query("SELECT id, doc FROM products WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        let mut resolved: HashMap<ProductId, Product> = HashMap::with_capacity(rows.len());
        for row in &rows {
            let product = row_to_product(row)?;
            resolved.insert(product.id, product);
        }

        let entries = cart
            .products
            .iter()
            .map(|entry| ResolvedEntry {
                product: resolved.get(&entry.product).cloned(),
                quantity: entry.quantity,
            })
            .collect();

        Ok(Some(ResolvedCart {
            id: cart.id,
            products: entries,
        }))
    }

    async fn add_product(&self, cart: CartId, product: ProductId) -> Result<Cart, CartError> {
        let mut state = self.load_cart(cart).await?.ok_or(CartError::CartNotFound)?;

        if !self.product_exists(product).await? {
            return Err(CartError::ProductNotFound);
        }

        state.add_one(product);
        self.save_cart(&state).await?;
        Ok(state)
    }

    async fn remove_product(&self, cart: CartId, product: ProductId) -> Result<Cart, CartError> {
        let mut state = self.load_cart(cart).await?.ok_or(CartError::CartNotFound)?;
        state.remove(product);
        self.save_cart(&state).await?;
        Ok(state)
    }

    async fn replace_all(&self, cart: CartId, entries: Vec<CartEntry>) -> Result<Cart, CartError> {
        let mut state = self.load_cart(cart).await?.ok_or(CartError::CartNotFound)?;
        state.products = entries;
        self.save_cart(&state).await?;
        Ok(state)
    }

    async fn set_quantity(
        &self,
        cart: CartId,
        product: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        let mut state = self.load_cart(cart).await?.ok_or(CartError::CartNotFound)?;

        if quantity == 0 {
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

        self.save_cart(&state).await?;
        Ok(state)
    }

    async fn clear(&self, cart: CartId) -> Result<Cart, CartError> {
        let mut state = self.load_cart(cart).await?.ok_or(CartError::CartNotFound)?;
        state.products.clear();
        self.save_cart(&state).await?;
        Ok(state)
    }
}

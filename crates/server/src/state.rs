//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{CartStore, MemoryStore, PgStore, ProductStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the document store. No other in-process state exists
/// between requests; everything lives in the store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    products: Arc<dyn ProductStore>,
    carts: Arc<dyn CartStore>,
}

impl AppState {
    /// Create application state over explicit store implementations.
    #[must_use]
    pub fn new(
        config: AppConfig,
        products: Arc<dyn ProductStore>,
        carts: Arc<dyn CartStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                carts,
            }),
        }
    }

    /// State backed by a fresh in-memory store. Used by tests and by local
    /// runs without a database.
    #[must_use]
    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store)
    }

    /// State backed by the `PostgreSQL` document store.
    #[must_use]
    pub fn with_postgres(config: AppConfig, store: PgStore) -> Self {
        let store = Arc::new(store);
        Self::new(config, store.clone(), store)
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the product collection.
    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }

    /// Get a reference to the cart collection.
    #[must_use]
    pub fn carts(&self) -> &dyn CartStore {
        self.inner.carts.as_ref()
    }
}

//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store connectivity)
//!
//! # Products API
//! GET    /api/products         - Paginated, filtered product list
//! GET    /api/products/{pid}   - Single product
//! POST   /api/products         - Create product
//! PUT    /api/products/{pid}   - Update product (partial merge)
//! DELETE /api/products/{pid}   - Delete product
//!
//! # Carts API
//! POST   /api/carts                          - Create empty cart
//! GET    /api/carts/{cid}                    - Cart with resolved products
//! POST   /api/carts/{cid}/products/{pid}     - Add one unit of a product
//! DELETE /api/carts/{cid}/products/{pid}     - Remove a product entry
//! PUT    /api/carts/{cid}                    - Replace entire product list
//! PUT    /api/carts/{cid}/products/{pid}     - Set entry quantity
//! DELETE /api/carts/{cid}                    - Empty the cart
//!
//! # Pages
//! GET  /                       - Redirect to /products
//! GET  /products               - Rendered product listing
//! GET  /carts/{cid}            - Rendered cart with computed total
//! ```
//!
//! Every API response is the JSON envelope
//! `{status: "success"|"error", payload?, message?}`. Unmatched routes get a
//! plain-text 404 with no envelope; clients depend on that asymmetry.

pub mod api;
pub mod pages;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use bazaar_core::ProductId;

use crate::state::AppState;

/// Create all routes for the server.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/", get(pages::root))
        .route("/products", get(pages::products_index))
        .route("/carts/{cid}", get(pages::cart_show))
        .nest("/api/products", api::products::routes())
        .nest("/api/carts", api::carts::routes())
        .nest_service("/static", ServeDir::new("crates/server/static"))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies store connectivity before returning OK.
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state
        .products()
        .get(ProductId::new(uuid::Uuid::nil()))
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Fallback for unmatched routes: plain text, no JSON envelope.
async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Route not found")
}

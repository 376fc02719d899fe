//! Cart API handlers.
//!
//! All cart mutations are read-modify-write on a single cart document; see
//! the store module for the concurrency caveat.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tracing::instrument;

use bazaar_core::{CartId, ProductId};

use crate::error::{AppError, Result};
use crate::models::CartEntry;
use crate::state::AppState;

use super::{success, success_with_message};

/// Create the cart API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{cid}", get(show).put(replace_all).delete(clear))
        .route(
            "/{cid}/products/{pid}",
            post(add_product).put(set_quantity).delete(remove_product),
        )
}

fn parse_cart_id(raw: &str) -> Result<CartId> {
    CartId::parse(raw).map_err(|_| AppError::NotFound("Cart not found".to_string()))
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|_| AppError::NotFound("Product not found".to_string()))
}

/// POST /api/carts - create an empty cart.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>) -> Result<(StatusCode, Json<Value>)> {
    let cart = state.carts().create().await?;
    Ok((StatusCode::CREATED, Json(success(&cart))))
}

/// GET /api/carts/{cid} - cart with product references resolved.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(cid): Path<String>) -> Result<Json<Value>> {
    let id = parse_cart_id(&cid)?;
    let cart = state
        .carts()
        .get_resolved(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;
    Ok(Json(success(&cart)))
}

/// POST /api/carts/{cid}/products/{pid} - add exactly one unit.
///
/// Any quantity in the request body is ignored; each call adds one unit.
#[instrument(skip(state))]
pub async fn add_product(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let cart_id = parse_cart_id(&cid)?;
    let product_id = parse_product_id(&pid)?;

    let cart = state.carts().add_product(cart_id, product_id).await?;
    Ok(Json(success_with_message("Product added to cart", &cart)))
}

/// DELETE /api/carts/{cid}/products/{pid} - drop the entry for a product.
///
/// Removing a product that is not in the cart is a no-op, not an error.
#[instrument(skip(state))]
pub async fn remove_product(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let cart_id = parse_cart_id(&cid)?;
    let product_id = parse_product_id(&pid)?;

    let cart = state.carts().remove_product(cart_id, product_id).await?;
    Ok(Json(success_with_message(
        "Product removed from cart",
        &cart,
    )))
}

/// PUT /api/carts/{cid} - replace the entire product list.
///
/// The body must carry a `products` array. Entries are stored as supplied
/// with no existence check against the product collection; a missing or zero
/// quantity defaults to 1.
#[instrument(skip(state, body))]
pub async fn replace_all(
    State(state): State<AppState>,
    Path(cid): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let cart_id = parse_cart_id(&cid)?;

    let Some(products) = body.get("products").and_then(Value::as_array) else {
        return Err(AppError::Validation(
            "Request body must contain a \"products\" array".to_string(),
        ));
    };

    let mut entries = Vec::with_capacity(products.len());
    for raw in products {
        let product = raw
            .get("product")
            .and_then(Value::as_str)
            .and_then(|s| ProductId::parse(s).ok())
            .ok_or_else(|| {
                AppError::Validation("Each entry needs a valid \"product\" reference".to_string())
            })?;
        let quantity = match raw.get("quantity").and_then(Value::as_u64).filter(|q| *q >= 1) {
            Some(q) => u32::try_from(q).map_err(|_| {
                AppError::Validation("Quantity is out of range".to_string())
            })?,
            None => 1,
        };
        entries.push(CartEntry { product, quantity });
    }

    let cart = state.carts().replace_all(cart_id, entries).await?;
    Ok(Json(success_with_message("Cart updated", &cart)))
}

/// PUT /api/carts/{cid}/products/{pid} - set an entry's quantity.
///
/// The quantity is absolute, not incremental; zero removes the entry.
#[instrument(skip(state, body))]
pub async fn set_quantity(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let cart_id = parse_cart_id(&cid)?;
    let product_id = parse_product_id(&pid)?;

    let quantity = body
        .get("quantity")
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            AppError::Validation(
                "Quantity must be a number greater than or equal to 0".to_string(),
            )
        })?;
    let quantity = u32::try_from(quantity)
        .map_err(|_| AppError::Validation("Quantity is out of range".to_string()))?;

    let cart = state
        .carts()
        .set_quantity(cart_id, product_id, quantity)
        .await?;
    Ok(Json(success_with_message("Product quantity updated", &cart)))
}

/// DELETE /api/carts/{cid} - empty the product list; the cart persists.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, Path(cid): Path<String>) -> Result<Json<Value>> {
    let cart_id = parse_cart_id(&cid)?;
    let cart = state.carts().clear(cart_id).await?;
    Ok(Json(success_with_message("Cart emptied", &cart)))
}

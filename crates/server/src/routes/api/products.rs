//! Product API handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use bazaar_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::Product;
use crate::query::{self, PageMeta, ProductFilter, SortOrder};
use crate::state::AppState;

use super::{PaginatedProducts, success, success_message};

/// Create the product API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{pid}", get(show).put(update).delete(delete))
}

/// Product list query parameters. Kept as raw strings so that non-numeric
/// values fall back to defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub sort: Option<String>,
    pub query: Option<String>,
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|_| AppError::NotFound("Product not found".to_string()))
}

/// GET /api/products - paginated, filtered, sorted product list.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedProducts>> {
    let filter = ProductFilter::parse(params.query.as_deref());
    let sort = SortOrder::parse(params.sort.as_deref());
    let page = query::parse_page(params.page.as_deref());
    let limit = query::parse_limit(params.limit.as_deref());

    let result = state.products().list(&filter, sort, page, limit).await?;
    let meta = PageMeta::compute(result.total, page, limit);

    let base = format!("{}/api/products", state.config().base_url);
    let link = |target: Option<u64>| {
        target.map(|p| {
            query::page_link(
                &base,
                p,
                limit,
                params.sort.as_deref(),
                params.query.as_deref(),
            )
        })
    };

    Ok(Json(PaginatedProducts {
        status: "success",
        payload: result.items,
        total_pages: meta.total_pages,
        prev_page: meta.prev_page,
        next_page: meta.next_page,
        page: meta.page,
        has_prev_page: meta.has_prev_page,
        has_next_page: meta.has_next_page,
        prev_link: link(meta.prev_page),
        next_link: link(meta.next_page),
    }))
}

/// GET /api/products/{pid} - single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(pid): Path<String>) -> Result<Json<Value>> {
    let id = parse_product_id(&pid)?;
    let product = state
        .products()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(success(&product)))
}

/// POST /api/products - create a product from the known attributes of the
/// body. No validation is applied; absent or mistyped fields pass through.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>)> {
    let fields = Product::draft_from(&body);
    let product = state.products().create(fields).await?;
    Ok((StatusCode::CREATED, Json(success(&product))))
}

/// PUT /api/products/{pid} - merge the body's fields onto the product.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let id = parse_product_id(&pid)?;
    let product = state
        .products()
        .update(id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(success(&product)))
}

/// DELETE /api/products/{pid}.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(pid): Path<String>) -> Result<Json<Value>> {
    let id = parse_product_id(&pid)?;
    if !state.products().delete(id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    Ok(Json(success_message("Product deleted")))
}

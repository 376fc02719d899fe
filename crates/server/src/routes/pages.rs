//! Server-rendered pages.
//!
//! The listing page reuses the same filter/pagination logic as the products
//! API, with relative prev/next links. Page-level failures are plain text
//! (404/500), unlike the API's JSON envelope.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::instrument;

use bazaar_core::CartId;

use crate::filters;
use crate::models::{Product, ResolvedCart};
use crate::query::{self, PageMeta, ProductFilter, SortOrder};
use crate::routes::api::products::ListParams;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub category: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title().unwrap_or("(untitled)").to_string(),
            description: product
                .field("description")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string(),
            price: product.price(),
            category: product.category().unwrap_or_default().to_string(),
        }
    }
}

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub title: String,
    pub price: Option<f64>,
    pub quantity: u32,
    pub line_total: Option<f64>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub id: String,
    pub items: Vec<CartItemView>,
    pub total: f64,
}

impl From<&ResolvedCart> for CartView {
    fn from(cart: &ResolvedCart) -> Self {
        let items = cart
            .products
            .iter()
            .map(|entry| {
                let price = entry.product.as_ref().and_then(Product::price);
                CartItemView {
                    title: entry.product.as_ref().map_or_else(
                        || "(product no longer available)".to_string(),
                        |p| p.title().unwrap_or("(untitled)").to_string(),
                    ),
                    price,
                    quantity: entry.quantity,
                    line_total: price.map(|p| p * f64::from(entry.quantity)),
                }
            })
            .collect();

        Self {
            id: cart.id.to_string(),
            items,
            total: cart.total(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub page: u64,
    pub total_pages: u64,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

/// Cart detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// GET / - redirect to the product listing.
pub async fn root() -> Redirect {
    Redirect::to("/products")
}

/// GET /products - rendered product listing with pagination links.
#[instrument(skip(state))]
pub async fn products_index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let filter = ProductFilter::parse(params.query.as_deref());
    let sort = SortOrder::parse(params.sort.as_deref());
    let page = query::parse_page(params.page.as_deref());
    let limit = query::parse_limit(params.limit.as_deref());

    let result = match state.products().list(&filter, sort, page, limit).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(error = %err, "Failed to load product listing");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error loading products").into_response();
        }
    };

    let meta = PageMeta::compute(result.total, page, limit);
    let link = |target: Option<u64>| {
        target.map(|p| {
            query::page_link(
                "/products",
                p,
                limit,
                params.sort.as_deref(),
                params.query.as_deref(),
            )
        })
    };

    ProductsIndexTemplate {
        products: result.items.iter().map(ProductView::from).collect(),
        page: meta.page,
        total_pages: meta.total_pages,
        prev_link: link(meta.prev_page),
        next_link: link(meta.next_page),
    }
    .into_response()
}

/// GET /carts/{cid} - rendered cart with the computed total.
#[instrument(skip(state))]
pub async fn cart_show(State(state): State<AppState>, Path(cid): Path<String>) -> Response {
    let Ok(id) = CartId::parse(&cid) else {
        return (StatusCode::NOT_FOUND, "Cart not found").into_response();
    };

    match state.carts().get_resolved(id).await {
        Ok(Some(cart)) => CartShowTemplate {
            cart: CartView::from(&cart),
        }
        .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Cart not found").into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to load cart page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading cart").into_response()
        }
    }
}

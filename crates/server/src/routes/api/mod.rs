//! JSON API handlers and the response envelope.

pub mod carts;
pub mod products;

use serde::Serialize;
use serde_json::{Value, json};

use crate::models::Product;

/// Build a `{status: "success", payload}` envelope.
pub fn success<T: Serialize>(payload: &T) -> Value {
    json!({ "status": "success", "payload": payload })
}

/// Build a success envelope carrying both a human-readable message and the
/// resulting document (cart mutations report both).
pub fn success_with_message<T: Serialize>(message: &str, payload: &T) -> Value {
    json!({ "status": "success", "message": message, "payload": payload })
}

/// Build a `{status: "success", message}` envelope with no payload.
pub fn success_message(message: &str) -> Value {
    json!({ "status": "success", "message": message })
}

/// Envelope for the paginated product list, carrying pagination metadata and
/// fully-qualified prev/next links alongside the page of documents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedProducts {
    pub status: &'static str,
    pub payload: Vec<Product>,
    pub total_pages: u64,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
    pub page: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

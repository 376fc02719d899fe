//! Product document model.
//!
//! Products are schemaless documents: the store assigns an opaque id and the
//! remaining attributes are carried as a free JSON object. No server-side
//! validation is applied; absent or mistyped fields are stored as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bazaar_core::ProductId;

/// Attribute names accepted by the create endpoint. Extra keys in a create
/// request body are dropped; update merges arbitrary keys.
pub const KNOWN_FIELDS: &[&str] = &[
    "title",
    "description",
    "code",
    "price",
    "status",
    "stock",
    "category",
    "thumbnails",
];

/// A product document: store-assigned id plus free-form attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    /// Build a product from an id and a JSON attribute object.
    #[must_use]
    pub fn new(id: ProductId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Extract the known product attributes from a create request body.
    ///
    /// Mirrors the create endpoint contract: only the named attributes are
    /// kept, anything else in the body is ignored. Values are not validated.
    #[must_use]
    pub fn draft_from(body: &Value) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(obj) = body.as_object() {
            for key in KNOWN_FIELDS {
                if let Some(value) = obj.get(*key) {
                    fields.insert((*key).to_string(), value.clone());
                }
            }
        }
        fields
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The product title, when present and a string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.field("title").and_then(Value::as_str)
    }

    /// The product price, when present and numeric.
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.field("price").and_then(Value::as_f64)
    }

    /// The product category, when present and a string.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.field("category").and_then(Value::as_str)
    }

    /// Availability flag, when present and boolean.
    #[must_use]
    pub fn status(&self) -> Option<bool> {
        self.field("status").and_then(Value::as_bool)
    }

    /// Merge a partial update onto this product's attributes.
    ///
    /// Keys present in `partial` replace the existing values wholesale; other
    /// keys are left untouched. The id is never overwritten.
    pub fn merge(&mut self, partial: &Value) {
        if let Some(obj) = partial.as_object() {
            for (key, value) in obj {
                if key == "id" {
                    continue;
                }
                self.fields.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_keeps_only_known_fields() {
        let body = json!({
            "title": "Shoe",
            "price": 10.5,
            "rogue": "dropped",
        });
        let fields = Product::draft_from(&body);
        assert_eq!(fields.get("title"), Some(&json!("Shoe")));
        assert_eq!(fields.get("price"), Some(&json!(10.5)));
        assert!(!fields.contains_key("rogue"));
    }

    #[test]
    fn test_draft_from_non_object_is_empty() {
        assert!(Product::draft_from(&json!("nope")).is_empty());
        assert!(Product::draft_from(&json!(null)).is_empty());
    }

    #[test]
    fn test_merge_replaces_and_preserves() {
        let id = ProductId::generate();
        let mut product = Product::new(
            id,
            Product::draft_from(&json!({"title": "Old", "stock": 3})),
        );
        product.merge(&json!({"title": "New", "id": "evil"}));
        assert_eq!(product.title(), Some("New"));
        assert_eq!(product.field("stock"), Some(&json!(3)));
        assert_eq!(product.id, id);
    }

    #[test]
    fn test_serialize_flattens_fields() {
        let product = Product::new(
            ProductId::generate(),
            Product::draft_from(&json!({"title": "Shoe", "status": true})),
        );
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["title"], json!("Shoe"));
        assert_eq!(value["status"], json!(true));
        assert!(value["id"].is_string());
    }
}

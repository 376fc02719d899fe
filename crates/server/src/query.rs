//! Product query building: filter expression parsing, sort order, and
//! pagination metadata.
//!
//! The filter expression is a client-supplied `field:value` string. A bare
//! string (no usable `field:value` split) is shorthand for a category match.
//! `status`/`available` filters compare against the literal `"true"`; every
//! other value, including `"false"` and garbage, yields a `status == false`
//! filter. Other fields match the raw value as a string with no coercion, so
//! a numeric field filtered this way will likely match nothing. These are
//! observed behaviors kept for compatibility.

use serde_json::Value;

use crate::models::Product;

/// Default page when the `page` parameter is absent or non-numeric.
pub const DEFAULT_PAGE: u64 = 1;
/// Default page size when the `limit` parameter is absent or non-numeric.
pub const DEFAULT_LIMIT: u64 = 10;

/// A structured product filter.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    /// Match every product.
    All,
    /// Equality match of one attribute against a JSON value.
    Field { name: String, value: Value },
}

impl ProductFilter {
    /// Parse a client-supplied filter expression.
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let Some(raw) = query.filter(|q| !q.is_empty()) else {
            return Self::All;
        };

        match raw.split_once(':') {
            Some((field, value)) if !field.is_empty() && !value.is_empty() => {
                if field == "status" || field == "available" {
                    Self::Field {
                        name: "status".to_string(),
                        value: Value::Bool(value == "true"),
                    }
                } else {
                    Self::Field {
                        name: field.to_string(),
                        value: Value::String(value.to_string()),
                    }
                }
            }
            // No usable field:value split: the whole string is a category
            _ => Self::Field {
                name: "category".to_string(),
                value: Value::String(raw.to_string()),
            },
        }
    }

    /// Whether a product document satisfies this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Field { name, value } => product.field(name) == Some(value),
        }
    }

    /// The filter as a JSON object usable for document containment queries.
    #[must_use]
    pub fn as_document(&self) -> Value {
        match self {
            Self::All => Value::Object(serde_json::Map::new()),
            Self::Field { name, value } => {
                let mut map = serde_json::Map::new();
                map.insert(name.clone(), value.clone());
                Value::Object(map)
            }
        }
    }
}

/// Explicit sort order over the product price attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse the `sort` query parameter. Anything other than `asc`/`desc`
    /// (including absent) means the store's natural order.
    #[must_use]
    pub fn parse(sort: Option<&str>) -> Option<Self> {
        match sort {
            Some("asc") => Some(Self::Asc),
            Some("desc") => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Parse the `page` parameter, defaulting when absent, non-numeric, or zero.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u64 {
    parse_positive(raw).unwrap_or(DEFAULT_PAGE)
}

/// Parse the `limit` parameter, defaulting when absent, non-numeric, or zero.
#[must_use]
pub fn parse_limit(raw: Option<&str>) -> u64 {
    parse_positive(raw).unwrap_or(DEFAULT_LIMIT)
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.parse::<u64>().ok()).filter(|v| *v >= 1)
}

/// Pagination metadata for one page of results.
///
/// Invariants: `has_prev_page ⇔ page > 1` and `has_next_page ⇔
/// page < total_pages`; when `total_pages` is zero both flags are false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u64,
    pub total_pages: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl PageMeta {
    /// Compute the metadata for `page` of a result set of `total_items`.
    #[must_use]
    pub fn compute(total_items: u64, page: u64, limit: u64) -> Self {
        let total_pages = total_items.div_ceil(limit.max(1));
        let has_prev_page = total_pages > 0 && page > 1;
        let has_next_page = page < total_pages;

        Self {
            page,
            total_pages,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }
}

/// Build a pagination link for `page`, reproducing the current `limit`,
/// `sort` and `query` parameters. `base` may be a fully-qualified URL (API
/// responses) or a path (rendered pages).
#[must_use]
pub fn page_link(base: &str, page: u64, limit: u64, sort: Option<&str>, query: Option<&str>) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    params.append_pair("page", &page.to_string());
    params.append_pair("limit", &limit.to_string());
    if let Some(sort) = sort.filter(|s| !s.is_empty()) {
        params.append_pair("sort", sort);
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        params.append_pair("query", query);
    }
    format!("{base}?{}", params.finish())
}

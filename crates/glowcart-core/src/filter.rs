//! The product grid filter/sort engine.
//!
//! [`filter_and_sort`] is a pure function from a catalog slice plus a
//! [`FilterState`] to a derived, ordered subset. It never mutates its input
//! and is deterministic: the same inputs always produce the same output in
//! the same order. All filter axes are AND-combined and an absent (or
//! empty-string) axis matches every product.
//!
//! Facet metafields are interpreted lazily here rather than at ingestion so
//! that a malformed metafield only affects the axis it belongs to: a product
//! with broken skin-type JSON still matches concern and price filters.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::fields::{normalize_facet, parse_list_field};

/// The six filter axes of the product grid, round-tripped through URL query
/// parameters (`category`, `skinType`, `skinConcern`, `ingredient`, `sort`,
/// `price`). The URL is the durable representation; an empty string on any
/// axis is treated identically to absence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "skinType")]
    pub skin_type: Option<String>,
    #[serde(default, rename = "skinConcern")]
    pub skin_concern: Option<String>,
    #[serde(default)]
    pub ingredient: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    /// Price bucket encoded as `"min-max"`, inclusive on both bounds.
    #[serde(default)]
    pub price: Option<String>,
}

impl FilterState {
    /// The sort order requested by this state. Unrecognized or absent sort
    /// strings fall back to [`SortKey::Relevance`].
    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        active(&self.sort).map_or(SortKey::Relevance, SortKey::parse)
    }

    /// True when no axis carries a constraint (every field absent or empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        active(&self.category).is_none()
            && active(&self.skin_type).is_none()
            && active(&self.skin_concern).is_none()
            && active(&self.ingredient).is_none()
            && active(&self.price).is_none()
    }
}

/// Treats empty and whitespace-only strings as absent.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Sort orders accepted by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    /// New arrivals first. This is a boolean bucket sort on the `is_new`
    /// marker, not a timestamp sort: recency is only encoded as a flag in
    /// the backend data. Products within each bucket keep their incoming
    /// relative order.
    Newest,
    /// Backend relevance: keep the caller-supplied order untouched.
    Relevance,
}

impl SortKey {
    /// Maps the wire sort parameter to a [`SortKey`]. `UPDATED_AT` is the
    /// backend's name for the new-arrivals bucket sort. Anything
    /// unrecognized is relevance.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PRICE_ASC" => Self::PriceAsc,
            "PRICE_DESC" => Self::PriceDesc,
            "UPDATED_AT" => Self::Newest,
            _ => Self::Relevance,
        }
    }
}

/// What the category axis matches against. A collection-scoped grid filters
/// on the product's own category label; the all-products grid matches any of
/// the product's assigned collection titles. Collections and product type
/// are different backend facets, so the two grids intentionally differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScope {
    ProductType,
    CollectionTitle,
}

/// Filters `products` by `filters` (all axes AND-combined) and sorts the
/// survivors. Pure and synchronous; the input slice is never mutated and
/// ties keep their incoming relative order (stable sort).
#[must_use]
pub fn filter_and_sort(
    products: &[Product],
    filters: &FilterState,
    scope: CategoryScope,
) -> Vec<Product> {
    let mut out: Vec<Product> = products
        .iter()
        .filter(|p| matches_filters(p, filters, scope))
        .cloned()
        .collect();

    match filters.sort_key() {
        SortKey::PriceAsc => out.sort_by(|a, b| compare_price(a, b, false)),
        SortKey::PriceDesc => out.sort_by(|a, b| compare_price(a, b, true)),
        SortKey::Newest => out.sort_by_key(|p| !p.is_new),
        SortKey::Relevance => {}
    }

    out
}

fn matches_filters(product: &Product, filters: &FilterState, scope: CategoryScope) -> bool {
    matches_category(product, active(&filters.category), scope)
        && matches_facet(product.skin_types.as_deref(), active(&filters.skin_type))
        && matches_facet(product.concerns.as_deref(), active(&filters.skin_concern))
        && matches_facet(product.ingredients.as_deref(), active(&filters.ingredient))
        && matches_price(product, active(&filters.price))
}

fn matches_category(product: &Product, wanted: Option<&str>, scope: CategoryScope) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };
    let wanted = normalize_label(wanted);
    match scope {
        CategoryScope::ProductType => product
            .product_type
            .as_deref()
            .is_some_and(|label| normalize_label(label) == wanted),
        CategoryScope::CollectionTitle => product
            .collections
            .iter()
            .any(|title| normalize_label(title) == wanted),
    }
}

/// Case-insensitive, whitespace-normalized label comparison form: interior
/// runs of whitespace collapse to a single space.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn matches_facet(raw: Option<&str>, wanted: Option<&str>) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };
    let wanted = normalize_facet(wanted);
    parse_list_field(raw)
        .iter()
        .any(|value| normalize_facet(value) == wanted)
}

fn matches_price(product: &Product, wanted: Option<&str>) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };
    // A malformed bucket ("min-max" expected) places no constraint; a
    // product whose own price does not parse cannot satisfy a bucket.
    let Some((min, max)) = parse_price_bucket(wanted) else {
        return true;
    };
    product
        .price_amount()
        .is_some_and(|amount| amount >= min && amount <= max)
}

/// Parses a `"min-max"` price bucket into inclusive bounds.
fn parse_price_bucket(raw: &str) -> Option<(f64, f64)> {
    let (min, max) = raw.split_once('-')?;
    let min = min.trim().parse::<f64>().ok()?;
    let max = max.trim().parse::<f64>().ok()?;
    Some((min, max))
}

fn compare_price(a: &Product, b: &Product, descending: bool) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    // Unparseable prices sort to the end regardless of direction.
    match (a.price_amount(), b.price_amount()) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;

//! Catalog domain types shared across the workspace.
//!
//! A [`Product`] is the normalized shape of one storefront product after
//! ingestion from the commerce backend. Facet metafields are carried in their
//! raw wire encoding (JSON array of strings or comma-separated string) and
//! only interpreted by the filter engine; see [`crate::fields`] for why the
//! encoding is kept loose.

use serde::{Deserialize, Serialize};

/// A storefront product, normalized for filtering and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Backend product ID, stored as a string to avoid precision loss.
    pub id: String,
    pub title: String,
    /// URL slug for the product page, e.g. `"renewing-night-serum"`.
    pub handle: String,
    /// Category label (backend `product_type`). Empty string is normalized
    /// to `None` during ingestion.
    pub product_type: Option<String>,
    /// Titles of the collections this product is assigned to. Used by the
    /// all-products grid, where the category filter matches collection
    /// titles rather than `product_type`.
    pub collections: Vec<String>,
    /// Price of the default variant as a decimal string, exactly as the
    /// backend returns it, e.g. `"42.00"`.
    pub price: String,
    /// ISO 4217 currency code (e.g., `"USD"`).
    pub currency: String,
    pub tags: Vec<String>,
    /// Skin-type facet metafield in its raw encoding: either a JSON array
    /// of strings (`["dry","oily"]`) or a comma-separated string.
    pub skin_types: Option<String>,
    /// Skin-concern facet metafield, same loose encoding as `skin_types`.
    pub concerns: Option<String>,
    /// Key-ingredient facet metafield, same loose encoding as `skin_types`.
    pub ingredients: Option<String>,
    /// Whether the backend marked this product as newly added. Parsed
    /// strictly at ingestion from the loose `"true"`/`"false"` metafield.
    pub is_new: bool,
}

impl Product {
    /// Default-variant price parsed as a float, or `None` when the backend
    /// string is not a parseable decimal.
    #[must_use]
    pub fn price_amount(&self) -> Option<f64> {
        self.price.trim().parse::<f64>().ok()
    }
}

/// A collection (id, title, handle) as listed by the backend. Populates the
/// category filter's options and drives collection-scoped grids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub title: String,
    pub handle: String,
}

//! Wire types for the commerce backend's public catalog endpoints.
//!
//! ## Observed shapes
//!
//! `GET {origin}/products.json` returns `{"products": [...]}` with cursor
//! pagination driven by the `Link` response header. `GET
//! {origin}/collections.json` returns `{"collections": [...]}`.
//!
//! Facet metafields are the loosest part of the payload. The same key may be
//! authored as a JSON array of strings, a comma-separated string, or (for
//! flags) a real boolean or the strings `"true"`/`"false"`, depending on the
//! admin definition. They are modelled as [`serde_json::Value`] here and
//! only interpreted during normalization and filtering.
//!
//! `product_type` may be an empty string; normalization maps it to `None`.
//! `position` on variants is 1-based with `1` the storefront default, but is
//! modelled as `Option<i32>` since older stores omit it.

use serde::Deserialize;
use serde_json::Value;

/// Top-level response from `GET /products.json`.
#[derive(Debug, Deserialize)]
pub struct WireProductsPage {
    pub products: Vec<WireProduct>,
}

/// Top-level response from `GET /collections.json`.
#[derive(Debug, Deserialize)]
pub struct WireCollectionsPage {
    pub collections: Vec<WireCollection>,
}

/// A single product as the backend serves it.
#[derive(Debug, Deserialize)]
pub struct WireProduct {
    /// Backend numeric product ID.
    pub id: i64,
    pub title: String,
    /// URL slug for the product page.
    pub handle: String,
    /// Category string; may be empty (`""`).
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Flexible facet metafields; see module docs for the encoding zoo.
    #[serde(default)]
    pub metafields: WireMetafields,
    pub variants: Vec<WireVariant>,
}

/// The facet metafields attached to a product. Every field is independently
/// optional and independently loosely typed.
#[derive(Debug, Default, Deserialize)]
pub struct WireMetafields {
    #[serde(default)]
    pub skin_type: Option<Value>,
    #[serde(default)]
    pub concern: Option<Value>,
    #[serde(default)]
    pub ingredient: Option<Value>,
    #[serde(default)]
    pub is_new: Option<Value>,
}

/// A purchasable variant of a [`WireProduct`].
#[derive(Debug, Deserialize)]
pub struct WireVariant {
    pub id: i64,
    pub title: String,
    /// Current price as a decimal string (e.g., `"42.00"`). Never null.
    pub price: String,
    /// ISO 4217 code; absent on stores that serve a single currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Whether the variant is purchasable. Defaults to `true` when absent.
    #[serde(default = "default_available")]
    pub available: bool,
    /// 1-based position; `1` is the storefront-default variant.
    #[serde(default)]
    pub position: Option<i32>,
}

/// A collection as listed by `GET /collections.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireCollection {
    pub id: i64,
    pub title: String,
    pub handle: String,
}

/// Minimal product shape used when listing a collection's members; only ids
/// are needed to attach membership.
#[derive(Debug, Deserialize)]
pub struct WireMemberPage {
    pub products: Vec<WireMember>,
}

#[derive(Debug, Deserialize)]
pub struct WireMember {
    pub id: i64,
}

/// serde `default = "..."` needs a function path; availability is assumed
/// when the backend omits the field.
fn default_available() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_deserializes_with_loose_metafields() {
        let raw = r#"{
            "id": 1001,
            "title": "Renewing Night Serum",
            "handle": "renewing-night-serum",
            "product_type": "Serums",
            "tags": ["bestseller"],
            "metafields": {
                "skin_type": ["dry", "combination"],
                "concern": "fine lines, dullness",
                "is_new": "true"
            },
            "variants": [
                {"id": 2001, "title": "30ml", "price": "42.00", "available": true, "position": 1}
            ]
        }"#;
        let product: WireProduct = serde_json::from_str(raw).expect("deserialization failed");
        assert_eq!(product.id, 1001);
        assert!(product.metafields.skin_type.as_ref().is_some_and(Value::is_array));
        assert!(product.metafields.concern.as_ref().is_some_and(Value::is_string));
        assert!(product.metafields.ingredient.is_none());
    }

    #[test]
    fn product_deserializes_without_metafields_block() {
        let raw = r#"{
            "id": 1,
            "title": "Cleanser",
            "handle": "cleanser",
            "variants": [{"id": 2, "title": "Default", "price": "18.00"}]
        }"#;
        let product: WireProduct = serde_json::from_str(raw).expect("deserialization failed");
        assert!(product.metafields.is_new.is_none());
        assert!(product.variants[0].available);
        assert!(product.variants[0].position.is_none());
    }

    #[test]
    fn collections_page_deserializes() {
        let raw = r#"{"collections":[{"id": 7, "title": "Bestsellers", "handle": "bestsellers"}]}"#;
        let page: WireCollectionsPage = serde_json::from_str(raw).expect("deserialization failed");
        assert_eq!(page.collections[0].handle, "bestsellers");
    }
}

//! Normalization from wire types to [`glowcart_core::Product`].
//!
//! Facet metafields are deliberately NOT interpreted here: they are carried
//! through in their raw encoding (JSON-array string or comma-separated
//! string) because membership parsing belongs to the filter engine, where a
//! malformed value can degrade per-axis instead of failing the product.
//! Only the `is_new` flag is resolved at this boundary, to a strict bool.

use glowcart_core::{parse_bool_field, Product};
use serde_json::Value;

use crate::error::ClientError;
use crate::types::{WireProduct, WireVariant};

/// Normalizes a raw [`WireProduct`] into a core [`Product`].
///
/// `collections` are the titles of the collections the product belongs to,
/// assembled by the caller from the membership endpoints.
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if the product has no variants or
/// the default variant carries an empty price.
pub fn normalize_product(
    product: WireProduct,
    collections: Vec<String>,
) -> Result<Product, ClientError> {
    let product_id = product.id.to_string();

    let default_variant =
        pick_default_variant(&product.variants).ok_or_else(|| ClientError::Normalization {
            product_id: product_id.clone(),
            reason: "product has no variants".into(),
        })?;

    if default_variant.price.is_empty() {
        return Err(ClientError::Normalization {
            product_id,
            reason: format!("variant {} has empty price", default_variant.id),
        });
    }

    let price = default_variant.price.clone();
    let currency = default_variant
        .currency
        .clone()
        .unwrap_or_else(|| "USD".to_string());

    let is_new = product
        .metafields
        .is_new
        .as_ref()
        .is_some_and(parse_bool_field);

    Ok(Product {
        id: product_id,
        title: product.title,
        handle: product.handle,
        // Empty string means "no category" on the wire.
        product_type: product.product_type.filter(|s| !s.is_empty()),
        collections,
        price,
        currency,
        tags: product.tags,
        skin_types: metafield_raw(product.metafields.skin_type),
        concerns: metafield_raw(product.metafields.concern),
        ingredients: metafield_raw(product.metafields.ingredient),
        is_new,
    })
}

/// The position-1 variant is the storefront default; stores without position
/// data fall back to the first variant by index.
fn pick_default_variant(variants: &[WireVariant]) -> Option<&WireVariant> {
    variants
        .iter()
        .find(|v| v.position == Some(1))
        .or_else(|| variants.first())
}

/// Flattens a loose metafield value into the raw string form the filter
/// engine expects: strings pass through, arrays (or any other JSON shape)
/// are re-serialized so the engine's JSON-array parse sees them unchanged.
fn metafield_raw(value: Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => serde_json::to_string(&other).ok(),
    }
}

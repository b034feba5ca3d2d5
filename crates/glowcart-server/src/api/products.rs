use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use glowcart_core::{
    filter_and_sort, CategoryScope, Disclosure, FilterState, Product, GRID_BATCH_SIZE,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Grid query: the six filter axes plus the progressive-disclosure window.
/// `show` is the count the client has revealed so far; it round-trips
/// through the URL like the filter axes do. Fields are spelled out rather
/// than flattening a `FilterState`: serde's flatten buffers every value as
/// a string, which breaks `show` under the urlencoded deserializer.
#[derive(Debug, Deserialize)]
pub(super) struct GridQuery {
    category: Option<String>,
    #[serde(rename = "skinType")]
    skin_type: Option<String>,
    #[serde(rename = "skinConcern")]
    skin_concern: Option<String>,
    ingredient: Option<String>,
    sort: Option<String>,
    price: Option<String>,
    show: Option<usize>,
}

impl GridQuery {
    fn filters(&self) -> FilterState {
        FilterState {
            category: self.category.clone(),
            skin_type: self.skin_type.clone(),
            skin_concern: self.skin_concern.clone(),
            ingredient: self.ingredient.clone(),
            sort: self.sort.clone(),
            price: self.price.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct GridItem {
    id: String,
    title: String,
    handle: String,
    product_type: Option<String>,
    price: String,
    currency: String,
    is_new: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct GridData {
    items: Vec<GridItem>,
    total: usize,
    visible: usize,
    has_more: bool,
    progress_percent: f64,
}

impl From<&Product> for GridItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            handle: product.handle.clone(),
            product_type: product.product_type.clone(),
            price: product.price.clone(),
            currency: product.currency.clone(),
            is_new: product.is_new,
        }
    }
}

/// The all-products grid. The category axis matches any of a product's
/// assigned collection titles here.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GridQuery>,
) -> Json<ApiResponse<GridData>> {
    let catalog = state.catalog.read().await.clone();
    let data = build_grid(
        &catalog.products,
        &query,
        CategoryScope::CollectionTitle,
    );
    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// A single collection's grid. Products are restricted to the collection's
/// members and the category axis matches the product's own category label.
pub(super) async fn list_collection_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
    Query(query): Query<GridQuery>,
) -> Result<Json<ApiResponse<GridData>>, ApiError> {
    let catalog = state.catalog.read().await.clone();
    let Some(collection) = catalog.collection_by_handle(&handle) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no collection with handle {handle}"),
        ));
    };

    let members: Vec<Product> = catalog
        .products
        .iter()
        .filter(|p| p.collections.contains(&collection.title))
        .cloned()
        .collect();

    let data = build_grid(&members, &query, CategoryScope::ProductType);
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Runs the filter/sort engine and applies the disclosure window.
fn build_grid(products: &[Product], query: &GridQuery, scope: CategoryScope) -> GridData {
    let filtered = filter_and_sort(products, &query.filters(), scope);
    let total = filtered.len();

    let disclosure = Disclosure::resume(
        GRID_BATCH_SIZE,
        query.show.unwrap_or(GRID_BATCH_SIZE),
    );
    let visible = disclosure.visible_count(total);

    GridData {
        items: filtered.iter().take(visible).map(GridItem::from).collect(),
        total,
        visible,
        has_more: disclosure.has_more(total),
        progress_percent: disclosure.progress_percent(total),
    }
}

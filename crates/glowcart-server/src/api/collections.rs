use axum::{extract::State, Extension, Json};
use glowcart_core::Collection;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CollectionItem {
    id: String,
    title: String,
    handle: String,
}

impl From<&Collection> for CollectionItem {
    fn from(collection: &Collection) -> Self {
        Self {
            id: collection.id.clone(),
            title: collection.title.clone(),
            handle: collection.handle.clone(),
        }
    }
}

/// Collection list backing the category filter's options.
pub(super) async fn list_collections(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CollectionItem>>> {
    let catalog = state.catalog.read().await.clone();
    let data = catalog.collections.iter().map(CollectionItem::from).collect();
    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

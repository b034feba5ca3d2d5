//! Recently-viewed products.
//!
//! The storefront UI persists this list in device-local storage; this
//! server-side store is the same collaborator for clients without local
//! storage. The list discipline (most-recent-first, de-duplicated, capped)
//! lives in `glowcart_core::recent`.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use glowcart_core::{record_recently_viewed, RecentStore};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

/// In-memory [`RecentStore`].
#[derive(Debug, Default)]
pub struct MemoryRecentStore {
    handles: Vec<String>,
}

impl RecentStore for MemoryRecentStore {
    fn read(&self) -> Vec<String> {
        self.handles.clone()
    }

    fn write(&mut self, handles: &[String]) {
        self.handles = handles.to_vec();
    }
}

pub(super) async fn list_recent(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<String>>> {
    let store = state.recent.lock().await;
    Json(ApiResponse {
        data: store.read(),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn record_view(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Json<ApiResponse<Vec<String>>> {
    let mut store = state.recent.lock().await;
    let updated = record_recently_viewed(&store.read(), &handle);
    store.write(&updated);
    Json(ApiResponse {
        data: updated,
        meta: ResponseMeta::new(req_id.0),
    })
}

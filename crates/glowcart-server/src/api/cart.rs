//! Cart endpoints.
//!
//! Every mutation runs through the coordination protocol: compute the
//! mutation key from the action and affected line ids, take a ticket from
//! the [`glowcart_cart::MutationCoordinator`], stage the change
//! optimistically, then settle. A ticket that is no longer current when the
//! mutation settles was superseded by a newer request on the same key; its
//! result is discarded rather than applied (last writer wins). A change that
//! fails validation rolls the optimistic overlay back to the last confirmed
//! cart, so the response never shows a partial quantity.

use axum::{extract::State, Extension, Json};
use glowcart_cart::{Cart, CartChange, LineInput, LineUpdate};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AddLinesBody {
    lines: Vec<LineInput>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateLinesBody {
    lines: Vec<LineUpdate>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RemoveLinesBody {
    line_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DiscountsBody {
    codes: Vec<String>,
}

pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Cart>> {
    let cart = state.cart.lock().await;
    Json(ApiResponse {
        data: cart.preview(),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn add_lines(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AddLinesBody>,
) -> Result<Json<ApiResponse<Cart>>, ApiError> {
    apply_change(&state, req_id, CartChange::AddLines { lines: body.lines }).await
}

pub(super) async fn update_lines(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateLinesBody>,
) -> Result<Json<ApiResponse<Cart>>, ApiError> {
    apply_change(&state, req_id, CartChange::UpdateLines { lines: body.lines }).await
}

pub(super) async fn remove_lines(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RemoveLinesBody>,
) -> Result<Json<ApiResponse<Cart>>, ApiError> {
    apply_change(
        &state,
        req_id,
        CartChange::RemoveLines {
            line_ids: body.line_ids,
        },
    )
    .await
}

pub(super) async fn update_discounts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DiscountsBody>,
) -> Result<Json<ApiResponse<Cart>>, ApiError> {
    apply_change(
        &state,
        req_id,
        CartChange::SetDiscountCodes { codes: body.codes },
    )
    .await
}

/// Shared mutation path: key, ticket, optimistic stage, settle.
async fn apply_change(
    state: &AppState,
    req_id: RequestId,
    change: CartChange,
) -> Result<Json<ApiResponse<Cart>>, ApiError> {
    let key = change.coordination_key();
    let ticket = state.coordinator.begin(&key);

    let mut cart = state.cart.lock().await;
    cart.stage(&key, change.clone());

    // Validate against confirmed truth before committing. A rejected change
    // rolls the overlay back so no partial state survives.
    let mut next = cart.committed().clone();
    if let Err(error) = next.apply(&change) {
        cart.rollback(&key);
        state.coordinator.finish(&ticket);
        return Err(ApiError::new(req_id.0, "validation_error", error.to_string()));
    }

    // A stale ticket means a newer mutation on this key was issued while
    // this one was settling; its staged change stays and this result is
    // dropped.
    if state.coordinator.finish(&ticket) {
        cart.commit(&key, next);
    }

    Ok(Json(ApiResponse {
        data: cart.preview(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

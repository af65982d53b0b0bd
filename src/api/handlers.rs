//! REST API endpoint handlers
//!
//! Thin adapters between the HTTP surface and the services layer. Handlers
//! validate nothing themselves beyond what deserialization already enforced;
//! errors bubble up as `AppError` and are mapped to HTTP statuses in one
//! place.

use crate::api::types::*;
use crate::error::Result;
use crate::services::{BidService, CatalogService, SessionInfo, SessionService};
use crate::state::AppState;
use axum::extract::{Json, State as AxumState};
use std::sync::Arc;

/// Health check endpoint - GET /health or GET /
pub async fn health_check() -> Json<ApiResponse<Empty>> {
    Json(ApiResponse::success_with_message(
        "ContractSIG Bid Calculator API is running",
    ))
}

// ============================================================================
// Session Handlers
// ============================================================================

/// Open a bid session - POST /api/v1/session
pub async fn open_session(
    AxumState(state): AxumState<Arc<AppState>>,
) -> Json<ApiResponse<SessionInfo>> {
    let info = SessionService::open_session(&state);
    Json(ApiResponse::success_with_data(info))
}

/// Close a bid session - POST /api/v1/session/close
pub async fn close_session(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(payload): Json<CloseSessionRequest>,
) -> Result<Json<ApiResponse<Empty>>> {
    SessionService::close_session(&state, &payload.session_id)?;
    Ok(Json(ApiResponse::success()))
}

// ============================================================================
// Catalog Handlers
// ============================================================================

/// Search the catalog - POST /api/v1/search
pub async fn search_catalog(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<ApiResponse<SearchData>>> {
    let session = SessionService::get_session(&state, &payload.session_id)?;
    let outcome = CatalogService::search(&state, &session, &payload.query).await?;

    Ok(Json(ApiResponse::success_with_data(SearchData {
        query: outcome.query,
        results: outcome.results,
        stale: outcome.stale,
    })))
}

// ============================================================================
// Bid Handlers
// ============================================================================

/// Add a catalog result to the bid - POST /api/v1/bid/add
pub async fn add_item(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<ItemData>>> {
    let session = SessionService::get_session(&state, &payload.session_id)?;
    let item = BidService::add_item(&session, &payload.result_id)?;
    Ok(Json(ApiResponse::success_with_data(ItemData { item })))
}

/// Remove a bid entry - POST /api/v1/bid/remove
pub async fn remove_item(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(payload): Json<RemoveItemRequest>,
) -> Result<Json<ApiResponse<ItemData>>> {
    let session = SessionService::get_session(&state, &payload.session_id)?;
    let item = BidService::remove_item(&session, &payload.entry_id)?;
    Ok(Json(ApiResponse::success_with_data(ItemData { item })))
}

/// Update an entry's quantity - POST /api/v1/bid/quantity
pub async fn update_quantity(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<Json<ApiResponse<ItemData>>> {
    let session = SessionService::get_session(&state, &payload.session_id)?;
    let item = BidService::update_quantity(&session, &payload.entry_id, payload.quantity)?;
    Ok(Json(ApiResponse::success_with_data(ItemData { item })))
}

/// Update an entry's markup - POST /api/v1/bid/markup
pub async fn update_markup(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(payload): Json<UpdateMarkupRequest>,
) -> Result<Json<ApiResponse<ItemData>>> {
    let session = SessionService::get_session(&state, &payload.session_id)?;
    let item = BidService::update_markup(&session, &payload.entry_id, payload.markup)?;
    Ok(Json(ApiResponse::success_with_data(ItemData { item })))
}

/// Set the global markup - POST /api/v1/bid/globalmarkup
pub async fn set_global_markup(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(payload): Json<GlobalMarkupRequest>,
) -> Result<Json<ApiResponse<GlobalMarkupData>>> {
    let session = SessionService::get_session(&state, &payload.session_id)?;
    let global_markup = BidService::set_global_markup(&session, payload.markup)?;
    Ok(Json(ApiResponse::success_with_data(GlobalMarkupData {
        global_markup,
    })))
}

/// Get the bid with derived totals - POST /api/v1/bid
pub async fn get_bid(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(payload): Json<SessionRequest>,
) -> Result<Json<ApiResponse<BidData>>> {
    let session = SessionService::get_session(&state, &payload.session_id)?;
    let snapshot = BidService::get_bid(&session);

    Ok(Json(ApiResponse::success_with_data(BidData {
        session_id: snapshot.session_id,
        items: snapshot.items,
        global_markup: snapshot.global_markup,
        summary: snapshot.summary,
    })))
}

/// Save & Export Bid - POST /api/v1/bid/export
///
/// Always responds 501: no export format has been specified by the product.
pub async fn export_bid(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(payload): Json<SessionRequest>,
) -> Result<Json<ApiResponse<Empty>>> {
    let session = SessionService::get_session(&state, &payload.session_id)?;
    BidService::export_bid(&session)?;
    Ok(Json(ApiResponse::success()))
}

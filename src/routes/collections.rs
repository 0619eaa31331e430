// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection and item routes.
//!
//! All mutation goes through the ordering engine (`LibraryService`) -
//! these handlers never write positions or cover images themselves.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Item, ItemDraft, MediaType};
use crate::services::library::CollectionWithItems;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Collection routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/collections", get(list_collections).post(create_collection))
        .route(
            "/api/collections/{id}",
            get(get_collection).delete(delete_collection),
        )
        .route("/api/collections/{id}/items", post(add_item))
        .route(
            "/api/collections/{id}/items/{item_id}",
            delete(remove_item),
        )
}

// ─── Collections ─────────────────────────────────────────────

/// Get all of the current user's collections with items.
async fn list_collections(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CollectionWithItems>>> {
    let collections = state.library.collections_with_items(&user.user_id).await?;
    Ok(Json(collections))
}

#[derive(Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    /// Advisory display type; defaults to movie like the web client.
    #[serde(default, rename = "type")]
    pub media_type: Option<MediaType>,
}

/// Create a collection in the lowest free grid slot.
async fn create_collection(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateCollectionRequest>,
) -> Result<Json<CollectionWithItems>> {
    let media_type = body.media_type.unwrap_or(MediaType::Movie);
    let collection = state
        .library
        .create_collection(&user.user_id, &body.name, media_type)
        .await?;

    Ok(Json(CollectionWithItems {
        collection,
        items: Vec::new(),
    }))
}

/// Get a single collection with its items.
async fn get_collection(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<CollectionWithItems>> {
    let collection = state
        .library
        .collection_with_items(&user.user_id, &id)
        .await?;
    Ok(Json(collection))
}

/// Response for delete endpoints.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Delete a collection and its items. The grid slot stays empty until a
/// future create refills it.
async fn delete_collection(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.library.delete_collection(&user.user_id, &id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

// ─── Items ───────────────────────────────────────────────────

/// Add an item to the end of a collection.
async fn add_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(draft): Json<ItemDraft>,
) -> Result<Json<Item>> {
    if draft.title.trim().is_empty() {
        return Err(AppError::Validation("Item title is required".to_string()));
    }

    let item = state.library.add_item(&user.user_id, &id, draft).await?;
    Ok(Json(item))
}

/// Remove an item and reindex its siblings.
async fn remove_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    state
        .library
        .remove_item(&user.user_id, &id, &item_id)
        .await?;
    Ok(Json(DeleteResponse { success: true }))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved-item routes: the per-user quick-lookup mirror of liked items.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Item, ItemDraft, SavedItem};
use crate::routes::collections::DeleteResponse;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Saved-item routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/saved-items",
        get(list_saved_items)
            .post(save_item)
            .delete(delete_saved_item),
    )
}

/// Get the current user's saved items, most recent first.
async fn list_saved_items(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SavedItem>>> {
    let saved = state.db.get_saved_items_for_user(&user.user_id).await?;
    Ok(Json(saved))
}

/// Save an item (the swipe-right path): lands in "My Likes" with dedup,
/// and refreshes the SavedItem mirror unconditionally.
async fn save_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<ItemDraft>,
) -> Result<Json<Item>> {
    if draft.title.trim().is_empty() {
        return Err(AppError::Validation("Item title is required".to_string()));
    }

    let item = state.library.save_item(&user.user_id, draft).await?;
    Ok(Json(item))
}

#[derive(Deserialize)]
struct DeleteSavedItemQuery {
    id: Option<String>,
}

/// Remove a saved item by its (composite) ID. Does not touch any Item
/// row in "My Likes" - the two lifecycles are independent.
async fn delete_saved_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<DeleteSavedItemQuery>,
) -> Result<Json<DeleteResponse>> {
    let id = params
        .id
        .ok_or_else(|| AppError::Validation("Item ID required".to_string()))?;

    // The ID must belong to the caller; a foreign ID reads as missing.
    match state.db.get_saved_item(&id).await? {
        Some(saved) if saved.user_id == user.user_id => {
            state.db.delete_saved_item(&id).await?;
            Ok(Json(DeleteResponse { success: true }))
        }
        _ => Err(AppError::NotFound("Saved item not found".to_string())),
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Swipe session routes.
//!
//! The session itself is the pure state machine in `services::swipe`;
//! these handlers own its side-effect boundary. A right-swipe fires the
//! save collaborator as a spawned task: the cursor advances immediately,
//! and a failed save is logged, never surfaced into the session.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Item, ItemDraft};
use crate::services::swipe::SwipeDirection;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Swiper routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/swiper/open", post(open))
        .route("/api/swiper/swipe", post(swipe))
        .route("/api/swiper/undo", post(undo))
        .route("/api/swiper/progress", get(progress))
        .route("/api/swiper/close", post(close))
}

/// Session status: 1-based progress and the item under the cursor.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SwiperStatus {
    pub active: bool,
    pub current: usize,
    pub total: usize,
    pub item: Option<Item>,
}

fn status_for(state: &AppState, user_id: &str) -> SwiperStatus {
    let (current, total) = state.swiper.progress(user_id);
    let item = state.swiper.current_item(user_id);
    SwiperStatus {
        active: item.is_some(),
        current,
        total,
        item,
    }
}

#[derive(Deserialize)]
pub struct OpenRequest {
    pub collection_id: String,
}

/// Open one of the user's collections for swiping.
///
/// An empty collection leaves the session idle (`active: false`), the
/// caller decides what to show.
async fn open(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<OpenRequest>,
) -> Result<Json<SwiperStatus>> {
    let collection = state
        .library
        .collection_with_items(&user.user_id, &body.collection_id)
        .await?;

    state.swiper.open(
        &user.user_id,
        collection.collection.id.clone(),
        collection.items,
    );

    Ok(Json(status_for(&state, &user.user_id)))
}

#[derive(Deserialize)]
pub struct SwipeRequest {
    pub direction: SwipeDirection,
}

/// Record a swipe and advance the cursor.
///
/// Swiping with no active session is a no-op that reports the idle
/// status - the session machine raises no errors of its own.
async fn swipe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SwipeRequest>,
) -> Result<Json<SwiperStatus>> {
    if let Some(action) = state.swiper.swipe(&user.user_id, body.direction) {
        // Direction meaning lives here, at the collaborator boundary:
        // right means save. Fire-and-forget - the cursor has already
        // advanced and a failed save only logs.
        if action.direction == SwipeDirection::Right {
            let library = state.library.clone();
            let user_id = user.user_id.clone();
            let draft = draft_from_item(&action.item);
            tokio::spawn(async move {
                if let Err(e) = library.save_item(&user_id, draft).await {
                    tracing::warn!(
                        user_id = %user_id,
                        error = %e,
                        "Save-on-swipe failed"
                    );
                }
            });
        }
    }

    Ok(Json(status_for(&state, &user.user_id)))
}

/// Rewind the last swipe. Already-fired saves stay saved.
async fn undo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SwiperStatus>> {
    state.swiper.undo(&user.user_id);
    Ok(Json(status_for(&state, &user.user_id)))
}

/// Current session progress.
async fn progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SwiperStatus>> {
    Ok(Json(status_for(&state, &user.user_id)))
}

/// Tear the session down.
async fn close(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SwiperStatus>> {
    state.swiper.close(&user.user_id);
    Ok(Json(status_for(&state, &user.user_id)))
}

fn draft_from_item(item: &Item) -> ItemDraft {
    ItemDraft {
        external_id: item.external_id.clone(),
        media_type: item.media_type,
        title: item.title.clone(),
        image: item.image.clone(),
        year: item.year.clone(),
        rating: item.rating,
        metadata: item.metadata.clone(),
    }
}

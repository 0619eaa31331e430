// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Media search routes.
//!
//! Thin dispatch over the provider clients. Upstream failures never show
//! up here - each provider degrades internally, so this handler only ever
//! answers 200 with a (possibly empty) result list.

use crate::error::{AppError, Result};
use crate::models::MediaType;
use crate::services::search::SearchResult;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Search routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/search/{media_type}", get(search))
}

#[derive(Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Search a media domain's provider.
async fn search(
    State(state): State<Arc<AppState>>,
    Path(media_type): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let media_type: MediaType = media_type
        .parse()
        .map_err(|_| AppError::Validation(format!("Unknown media type: {}", media_type)))?;

    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Query parameter required".to_string()))?;

    tracing::debug!(media_type = %media_type, query, "Searching");

    let results = state.search.search(media_type, query).await;
    Ok(Json(SearchResponse { results }))
}

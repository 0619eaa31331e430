// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SavedItem model: a per-user quick-lookup mirror of liked items.

use crate::models::media::MediaType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Saved item stored in Firestore.
///
/// Keyed uniquely by (user_id, external_id, type) - the document ID is the
/// composite `saved_item_doc_id`, which makes the save-path upsert a single
/// idempotent write. Lifecycle is independent from any Item row mirroring
/// the same media entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SavedItem {
    /// Owning user's ID
    pub user_id: String,
    /// Source-system identifier
    pub external_id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub image: Option<String>,
    /// Opaque source-specific fields, refreshed on every save
    #[cfg_attr(feature = "binding-generation", ts(type = "any"))]
    pub metadata: Option<serde_json::Value>,
    /// When the item was first saved (or last upserted)
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub saved_at: DateTime<Utc>,
}

impl SavedItem {
    /// Composite document ID for the (user, external_id, type) key.
    ///
    /// `external_id` is percent-encoded since upstream IDs may contain
    /// characters Firestore document IDs reject.
    pub fn doc_id(&self) -> String {
        saved_item_doc_id(&self.user_id, &self.external_id, self.media_type)
    }
}

/// Build the composite SavedItem document ID.
pub fn saved_item_doc_id(
    user_id: &str,
    external_id: &str,
    media_type: MediaType,
) -> String {
    format!(
        "{}_{}_{}",
        user_id,
        urlencoding::encode(external_id),
        media_type
    )
}

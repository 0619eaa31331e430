// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Item model: a single media entry inside a collection.

use crate::models::media::MediaType;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Item stored in Firestore.
///
/// `position` is a dense zero-based index within the owning collection:
/// for N items the stored positions are exactly {0, ..., N-1}, ascending
/// order defines display and swipe order. Items are only ever appended or
/// removed-and-reindexed, never inserted mid-sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Item {
    /// Generated UUID (also used as document ID)
    pub id: String,
    /// Owning collection's ID
    pub collection_id: String,
    /// Source-system identifier (not unique across sources)
    pub external_id: String,
    /// The item's own media type, independent of the collection's
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub image: Option<String>,
    /// Release year as the source reports it
    pub year: Option<String>,
    /// Source-native rating scale (TMDB 0-10, Steam 0-5, ...)
    pub rating: Option<f64>,
    /// User-authored review text
    pub review: Option<String>,
    /// Opaque source-specific fields (studio, developer, genres, ...).
    /// Never interpreted server-side.
    #[cfg_attr(feature = "binding-generation", ts(type = "any"))]
    pub metadata: Option<serde_json::Value>,
    /// Dense zero-based position within the collection
    pub position: u32,
    /// When the item was added (RFC3339)
    pub created_at: String,
}

/// Incoming item fields for create paths; position and IDs are assigned
/// by the ordering engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub external_id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

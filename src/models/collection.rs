// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection model: a named, positioned bucket of items on the profile grid.

use crate::models::media::MediaType;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of grid slots on a profile (positions 0 through GRID_SLOTS-1).
pub const GRID_SLOTS: u32 = 9;

/// Collection stored in Firestore.
///
/// `position` is a fixed grid slot in [0, GRID_SLOTS), unique per user.
/// Slots are user-arranged: deleting a collection leaves a gap that stays
/// until a future create refills it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Collection {
    /// Generated UUID (also used as document ID)
    pub id: String,
    /// Owning user's ID
    pub user_id: String,
    /// Display name (non-blank)
    pub name: String,
    /// Advisory media type; items carry their own
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Grid slot, 0-8
    pub position: u32,
    /// Denormalized thumbnail, derived from the first item by position
    pub cover_image: Option<String>,
    /// When the collection was created (RFC3339)
    pub created_at: String,
}

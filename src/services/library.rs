// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection ordering engine.
//!
//! Owns every write to Collections and Items so the two ordering
//! invariants hold at a single choke point:
//! - a user's collections occupy unique grid slots in [0, 9), allocated
//!   as the lowest unused slot and never compacted after deletes;
//! - a collection's items carry dense zero-based positions {0, ..., N-1},
//!   appended at the end and reindexed after removal.
//!
//! The derived `cover_image` field is kept in sync with the item at
//! position 0 on the same choke points.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::collection::GRID_SLOTS;
use crate::models::{Collection, Item, ItemDraft, MediaType, SavedItem};
use crate::time_utils::now_rfc3339;
use serde::Serialize;
use std::collections::HashSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Name of the implicit collection that swipe-right saves land in.
pub const MY_LIKES_NAME: &str = "My Likes";

/// A collection together with its items in display order.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CollectionWithItems {
    #[serde(flatten)]
    pub collection: Collection,
    pub items: Vec<Item>,
}

/// Business-logic layer for collections and items.
#[derive(Clone)]
pub struct LibraryService {
    db: FirestoreDb,
}

impl LibraryService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Create a collection in the lowest unused grid slot.
    pub async fn create_collection(
        &self,
        user_id: &str,
        name: &str,
        media_type: MediaType,
    ) -> Result<Collection, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Collection name is required".to_string(),
            ));
        }

        let existing = self.db.get_collections_for_user(user_id).await?;
        if existing.len() as u32 >= GRID_SLOTS {
            return Err(AppError::Capacity(format!(
                "Collection limit reached ({} slots)",
                GRID_SLOTS
            )));
        }

        let position = lowest_free_slot(existing.iter().map(|c| c.position)).ok_or_else(|| {
            AppError::Capacity("No free grid slot available".to_string())
        })?;

        let collection = Collection {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            media_type,
            position,
            cover_image: None,
            created_at: now_rfc3339(),
        };
        self.db.set_collection(&collection).await?;

        tracing::info!(
            user_id,
            collection_id = %collection.id,
            position,
            "Collection created"
        );
        Ok(collection)
    }

    /// Delete a collection and its items.
    ///
    /// Other collections keep their grid slots - the resulting gap stays
    /// until a future create refills it.
    pub async fn delete_collection(
        &self,
        user_id: &str,
        collection_id: &str,
    ) -> Result<(), AppError> {
        let _ = self.owned_collection(user_id, collection_id).await?;
        self.db.delete_collection(collection_id).await?;
        tracing::info!(user_id, collection_id, "Collection deleted");
        Ok(())
    }

    /// Append an item to the end of a collection.
    ///
    /// Duplicates of (external_id, type) are permitted on this path; only
    /// the save-via-swipe path dedupes.
    pub async fn add_item(
        &self,
        user_id: &str,
        collection_id: &str,
        draft: ItemDraft,
    ) -> Result<Item, AppError> {
        let collection = self.owned_collection(user_id, collection_id).await?;
        let existing = self.db.get_items_for_collection(collection_id).await?;
        self.append_item(&collection, existing.len() as u32, draft)
            .await
    }

    /// Remove an item, reindex the survivors, then resync the cover.
    ///
    /// The reindex must complete before the cover is derived from "the new
    /// first item" - reading the first item off the stale ordering would
    /// pin the cover to the wrong image.
    pub async fn remove_item(
        &self,
        user_id: &str,
        collection_id: &str,
        item_id: &str,
    ) -> Result<(), AppError> {
        let mut collection = self.owned_collection(user_id, collection_id).await?;

        let item = self.db.get_item(item_id).await?;
        match item {
            Some(ref i) if i.collection_id == collection_id => {}
            _ => {
                return Err(AppError::NotFound(
                    "Item not found in collection".to_string(),
                ))
            }
        }

        self.db.delete_item(item_id).await?;

        // Phase 1: close the position gap. Only rows whose stored position
        // differs from their new index are rewritten.
        let remaining = self.db.get_items_for_collection(collection_id).await?;
        let moves = reindex_moves(&remaining);
        if !moves.is_empty() {
            self.db.apply_item_moves(&moves).await?;
        }

        // Phase 2: resync the cover against the new first item.
        let new_cover = remaining.first().and_then(|i| i.image.clone());
        if collection.cover_image != new_cover {
            collection.cover_image = new_cover;
            self.db.set_collection(&collection).await?;
        }

        tracing::info!(
            user_id,
            collection_id,
            item_id,
            reindexed = moves.len(),
            "Item removed"
        );
        Ok(())
    }

    /// Save an item from a swipe-right.
    ///
    /// Lands the item in the user's "My Likes" collection (created on
    /// demand) with per-collection dedup on (external_id, type), then
    /// unconditionally upserts the SavedItem mirror so it always carries
    /// the latest metadata - even when the Item row already existed.
    pub async fn save_item(&self, user_id: &str, draft: ItemDraft) -> Result<Item, AppError> {
        let likes = match self.db.find_collection_by_name(user_id, MY_LIKES_NAME).await? {
            Some(c) => c,
            None => {
                let existing = self.db.get_collections_for_user(user_id).await?;
                let position = lowest_free_slot(existing.iter().map(|c| c.position))
                    .ok_or_else(|| {
                        AppError::Capacity(
                            "No free grid slot for the likes collection".to_string(),
                        )
                    })?;

                let collection = Collection {
                    id: uuid::Uuid::new_v4().to_string(),
                    user_id: user_id.to_string(),
                    name: MY_LIKES_NAME.to_string(),
                    // Will hold mixed content; items carry their own type.
                    media_type: MediaType::Mixed,
                    position,
                    cover_image: None,
                    created_at: now_rfc3339(),
                };
                self.db.set_collection(&collection).await?;
                tracing::info!(user_id, position, "Created likes collection");
                collection
            }
        };

        let item = match self
            .db
            .find_item_in_collection(&likes.id, &draft.external_id, draft.media_type)
            .await?
        {
            Some(existing) => existing,
            None => {
                let count = self.db.get_items_for_collection(&likes.id).await?.len() as u32;
                self.append_item(&likes, count, draft.clone()).await?
            }
        };

        // The mirror refreshes unconditionally: an Item created earlier
        // with different data does not stop SavedItem from taking the
        // latest title/image/metadata.
        let saved = SavedItem {
            user_id: user_id.to_string(),
            external_id: draft.external_id,
            media_type: draft.media_type,
            title: draft.title,
            image: draft.image,
            metadata: draft.metadata,
            saved_at: chrono::Utc::now(),
        };
        self.db.upsert_saved_item(&saved).await?;

        Ok(item)
    }

    /// Create the three starter collections if the user has none.
    pub async fn ensure_default_collections(&self, user_id: &str) -> Result<(), AppError> {
        let existing = self.db.get_collections_for_user(user_id).await?;
        if !existing.is_empty() {
            return Ok(());
        }

        let defaults = [
            ("Favorites", MediaType::Mixed, 0),
            ("Watchlist", MediaType::Movie, 1),
            ("Playing", MediaType::Game, 2),
        ];
        for (name, media_type, position) in defaults {
            let collection = Collection {
                id: uuid::Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                name: name.to_string(),
                media_type,
                position,
                cover_image: None,
                created_at: now_rfc3339(),
            };
            self.db.set_collection(&collection).await?;
        }

        tracing::info!(user_id, "Default collections created");
        Ok(())
    }

    /// A user's collections with their items, both in display order.
    pub async fn collections_with_items(
        &self,
        user_id: &str,
    ) -> Result<Vec<CollectionWithItems>, AppError> {
        let collections = self.db.get_collections_for_user(user_id).await?;
        let mut out = Vec::with_capacity(collections.len());
        for collection in collections {
            let items = self.db.get_items_for_collection(&collection.id).await?;
            out.push(CollectionWithItems { collection, items });
        }
        Ok(out)
    }

    /// A single collection with its items, ownership-checked.
    pub async fn collection_with_items(
        &self,
        user_id: &str,
        collection_id: &str,
    ) -> Result<CollectionWithItems, AppError> {
        let collection = self.owned_collection(user_id, collection_id).await?;
        let items = self.db.get_items_for_collection(collection_id).await?;
        Ok(CollectionWithItems { collection, items })
    }

    /// Fetch a collection and verify ownership.
    ///
    /// A collection owned by someone else surfaces as NotFound, the same
    /// as a missing one, so the response never confirms existence.
    async fn owned_collection(
        &self,
        user_id: &str,
        collection_id: &str,
    ) -> Result<Collection, AppError> {
        match self.db.get_collection(collection_id).await? {
            Some(c) if c.user_id == user_id => Ok(c),
            _ => Err(AppError::NotFound("Collection not found".to_string())),
        }
    }

    /// Shared append: assign the next position and derive the cover when
    /// the first item with an image lands.
    async fn append_item(
        &self,
        collection: &Collection,
        current_count: u32,
        draft: ItemDraft,
    ) -> Result<Item, AppError> {
        let item = Item {
            id: uuid::Uuid::new_v4().to_string(),
            collection_id: collection.id.clone(),
            external_id: draft.external_id,
            media_type: draft.media_type,
            title: draft.title,
            image: draft.image,
            year: draft.year,
            rating: draft.rating,
            review: None,
            metadata: draft.metadata,
            position: current_count,
            created_at: now_rfc3339(),
        };
        self.db.set_item(&item).await?;

        if current_count == 0 {
            if let Some(ref image) = item.image {
                let mut updated = collection.clone();
                updated.cover_image = Some(image.clone());
                self.db.set_collection(&updated).await?;
            }
        }

        Ok(item)
    }
}

/// Smallest grid slot in [0, GRID_SLOTS) not present in `used`.
///
/// An explicit scan, not a count: collection deletes leave gaps that must
/// be refillable, so `used.len()` says nothing about which slot is free.
pub fn lowest_free_slot(used: impl IntoIterator<Item = u32>) -> Option<u32> {
    let used: HashSet<u32> = used.into_iter().collect();
    (0..GRID_SLOTS).find(|slot| !used.contains(slot))
}

/// Compute the minimal set of position rewrites for `items`, which must
/// already be sorted ascending by stored position.
///
/// Relative order is preserved; only entries whose stored position differs
/// from their index produce a move.
pub fn reindex_moves(items: &[Item]) -> Vec<(Item, u32)> {
    items
        .iter()
        .enumerate()
        .filter(|(index, item)| item.position != *index as u32)
        .map(|(index, item)| (item.clone(), index as u32))
        .collect()
}

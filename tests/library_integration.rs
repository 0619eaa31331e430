// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordering-engine integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST set). Each test uses fresh UUIDs for
//! isolation.

use tasteid::error::AppError;
use tasteid::models::collection::GRID_SLOTS;
use tasteid::models::saved_item::saved_item_doc_id;
use tasteid::models::{ItemDraft, MediaType};
use tasteid::services::google_auth::GoogleUserInfo;
use tasteid::services::{GoogleAuthService, LibraryService};

mod common;
use common::test_db;

fn unique_user_id() -> String {
    format!("user-{}", uuid::Uuid::new_v4())
}

fn draft(external_id: &str, title: &str, image: Option<&str>) -> ItemDraft {
    ItemDraft {
        external_id: external_id.to_string(),
        media_type: MediaType::Movie,
        title: title.to_string(),
        image: image.map(str::to_string),
        year: None,
        rating: None,
        metadata: None,
    }
}

async fn library() -> LibraryService {
    LibraryService::new(test_db().await)
}

// ═══════════════════════════════════════════════════════════════════════════
// ITEM POSITION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_items_append_densely() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let collection = library
        .create_collection(&user_id, "Favorites", MediaType::Movie)
        .await
        .unwrap();

    for (i, title) in ["Dune", "Inception", "Whiplash"].iter().enumerate() {
        let item = library
            .add_item(&user_id, &collection.id, draft(&i.to_string(), title, None))
            .await
            .unwrap();
        assert_eq!(item.position, i as u32);
    }

    let items = db.get_items_for_collection(&collection.id).await.unwrap();
    let positions: Vec<u32> = items.iter().map(|i| i.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_remove_middle_item_reindexes_survivors() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let collection = library
        .create_collection(&user_id, "Queue", MediaType::Movie)
        .await
        .unwrap();

    // Positions [0,1,2,3]
    let mut ids = Vec::new();
    for i in 0..4 {
        let item = library
            .add_item(
                &user_id,
                &collection.id,
                draft(&format!("ext{}", i), &format!("Movie {}", i), None),
            )
            .await
            .unwrap();
        ids.push(item.id);
    }

    // Delete the item at position 1
    library
        .remove_item(&user_id, &collection.id, &ids[1])
        .await
        .unwrap();

    // Former positions 0,2,3 must land on 0,1,2 in original relative order
    let items = db.get_items_for_collection(&collection.id).await.unwrap();
    let got: Vec<(String, u32)> = items.iter().map(|i| (i.id.clone(), i.position)).collect();
    assert_eq!(
        got,
        vec![
            (ids[0].clone(), 0),
            (ids[2].clone(), 1),
            (ids[3].clone(), 2)
        ]
    );
}

#[tokio::test]
async fn test_positions_stay_dense_across_mixed_sequence() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let collection = library
        .create_collection(&user_id, "Churn", MediaType::Game)
        .await
        .unwrap();

    // add 3, remove head, add 2, remove tail
    let mut ids = Vec::new();
    for i in 0..3 {
        let item = library
            .add_item(&user_id, &collection.id, draft(&i.to_string(), "G", None))
            .await
            .unwrap();
        ids.push(item.id);
    }
    library
        .remove_item(&user_id, &collection.id, &ids[0])
        .await
        .unwrap();
    for i in 3..5 {
        let item = library
            .add_item(&user_id, &collection.id, draft(&i.to_string(), "G", None))
            .await
            .unwrap();
        ids.push(item.id);
    }
    library
        .remove_item(&user_id, &collection.id, ids.last().unwrap())
        .await
        .unwrap();

    // After any sequence the multiset of positions is {0..N-1}
    let items = db.get_items_for_collection(&collection.id).await.unwrap();
    let positions: Vec<u32> = items.iter().map(|i| i.position).collect();
    assert_eq!(positions, (0..items.len() as u32).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_remove_item_from_wrong_collection_is_not_found() {
    require_emulator!();

    let library = library().await;
    let user_id = unique_user_id();

    let a = library
        .create_collection(&user_id, "A", MediaType::Movie)
        .await
        .unwrap();
    let b = library
        .create_collection(&user_id, "B", MediaType::Movie)
        .await
        .unwrap();

    let item = library
        .add_item(&user_id, &a.id, draft("1", "In A", None))
        .await
        .unwrap();

    // Deleting through the wrong collection must not touch the item
    let err = library.remove_item(&user_id, &b.id, &item.id).await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// COVER IMAGE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_first_item_with_image_sets_cover() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let collection = library
        .create_collection(&user_id, "Covers", MediaType::Movie)
        .await
        .unwrap();
    assert!(collection.cover_image.is_none());

    library
        .add_item(
            &user_id,
            &collection.id,
            draft("1", "First", Some("https://img/first.jpg")),
        )
        .await
        .unwrap();
    library
        .add_item(
            &user_id,
            &collection.id,
            draft("2", "Second", Some("https://img/second.jpg")),
        )
        .await
        .unwrap();

    // First item's image sticks; the second append never touches it
    let fetched = db.get_collection(&collection.id).await.unwrap().unwrap();
    assert_eq!(fetched.cover_image.as_deref(), Some("https://img/first.jpg"));
}

#[tokio::test]
async fn test_removing_first_item_resyncs_cover() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let collection = library
        .create_collection(&user_id, "Covers", MediaType::Movie)
        .await
        .unwrap();

    let first = library
        .add_item(
            &user_id,
            &collection.id,
            draft("1", "First", Some("https://img/first.jpg")),
        )
        .await
        .unwrap();
    library
        .add_item(
            &user_id,
            &collection.id,
            draft("2", "Second", Some("https://img/second.jpg")),
        )
        .await
        .unwrap();

    library
        .remove_item(&user_id, &collection.id, &first.id)
        .await
        .unwrap();

    let fetched = db.get_collection(&collection.id).await.unwrap().unwrap();
    assert_eq!(
        fetched.cover_image.as_deref(),
        Some("https://img/second.jpg")
    );
}

#[tokio::test]
async fn test_removing_sole_item_clears_cover() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let collection = library
        .create_collection(&user_id, "Covers", MediaType::Movie)
        .await
        .unwrap();
    let only = library
        .add_item(
            &user_id,
            &collection.id,
            draft("1", "Only", Some("https://img/only.jpg")),
        )
        .await
        .unwrap();

    library
        .remove_item(&user_id, &collection.id, &only.id)
        .await
        .unwrap();

    let fetched = db.get_collection(&collection.id).await.unwrap().unwrap();
    assert!(fetched.cover_image.is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// GRID SLOT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_grid_fills_lowest_slot_and_caps_at_nine() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    for i in 0..GRID_SLOTS {
        let c = library
            .create_collection(&user_id, &format!("C{}", i), MediaType::Movie)
            .await
            .unwrap();
        assert_eq!(c.position, i);
    }

    // Tenth create fails with CapacityError and writes nothing
    let err = library
        .create_collection(&user_id, "Overflow", MediaType::Movie)
        .await;
    assert!(matches!(err, Err(AppError::Capacity(_))));

    let collections = db.get_collections_for_user(&user_id).await.unwrap();
    assert_eq!(collections.len() as u32, GRID_SLOTS);

    // All positions unique and in range
    let mut positions: Vec<u32> = collections.iter().map(|c| c.position).collect();
    positions.sort_unstable();
    assert_eq!(positions, (0..GRID_SLOTS).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_deleted_slot_is_refilled_by_next_create() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let mut created = Vec::new();
    for name in ["A", "B", "C"] {
        created.push(
            library
                .create_collection(&user_id, name, MediaType::Movie)
                .await
                .unwrap(),
        );
    }

    // Delete the middle collection; the gap persists (no compaction)
    library
        .delete_collection(&user_id, &created[1].id)
        .await
        .unwrap();
    let remaining = db.get_collections_for_user(&user_id).await.unwrap();
    let positions: Vec<u32> = remaining.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![0, 2]);

    // The next create lands in the gap
    let refill = library
        .create_collection(&user_id, "D", MediaType::Movie)
        .await
        .unwrap();
    assert_eq!(refill.position, 1);
}

#[tokio::test]
async fn test_delete_collection_cascades_items() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let collection = library
        .create_collection(&user_id, "Doomed", MediaType::Movie)
        .await
        .unwrap();
    for i in 0..3 {
        library
            .add_item(&user_id, &collection.id, draft(&i.to_string(), "X", None))
            .await
            .unwrap();
    }

    library
        .delete_collection(&user_id, &collection.id)
        .await
        .unwrap();

    assert!(db.get_collection(&collection.id).await.unwrap().is_none());
    assert!(db
        .get_items_for_collection(&collection.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_foreign_collection_reads_as_missing() {
    require_emulator!();

    let library = library().await;
    let owner = unique_user_id();
    let stranger = unique_user_id();

    let collection = library
        .create_collection(&owner, "Private", MediaType::Movie)
        .await
        .unwrap();

    // Another user's delete answers NotFound, not Forbidden - existence
    // is never confirmed.
    let err = library.delete_collection(&stranger, &collection.id).await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// SAVE-VIA-SWIPE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_save_item_creates_likes_collection_on_demand() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let item = library
        .save_item(&user_id, draft("603", "The Matrix", Some("https://img/m.jpg")))
        .await
        .unwrap();
    assert_eq!(item.position, 0);

    let likes = db
        .find_collection_by_name(&user_id, "My Likes")
        .await
        .unwrap()
        .expect("likes collection created on demand");
    assert_eq!(likes.position, 0);
    // First saved item's image became the cover
    assert_eq!(likes.cover_image.as_deref(), Some("https://img/m.jpg"));
}

#[tokio::test]
async fn test_save_item_is_idempotent_but_mirror_refreshes() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    let first = library
        .save_item(&user_id, draft("603", "The Matrix", Some("https://img/old.jpg")))
        .await
        .unwrap();

    // Same (external_id, type), different metadata on the second call
    let second = library
        .save_item(
            &user_id,
            draft("603", "The Matrix (1999)", Some("https://img/new.jpg")),
        )
        .await
        .unwrap();

    // Exactly one Item row, returned unchanged
    assert_eq!(first.id, second.id);
    assert_eq!(second.title, "The Matrix");

    let likes = db
        .find_collection_by_name(&user_id, "My Likes")
        .await
        .unwrap()
        .unwrap();
    let items = db.get_items_for_collection(&likes.id).await.unwrap();
    assert_eq!(items.len(), 1);

    // ...but the SavedItem mirror took the second call's values
    let doc_id = saved_item_doc_id(&user_id, "603", MediaType::Movie);
    let saved = db.get_saved_item(&doc_id).await.unwrap().unwrap();
    assert_eq!(saved.title, "The Matrix (1999)");
    assert_eq!(saved.image.as_deref(), Some("https://img/new.jpg"));
}

#[tokio::test]
async fn test_save_item_full_grid_without_likes_aborts() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    for i in 0..GRID_SLOTS {
        library
            .create_collection(&user_id, &format!("C{}", i), MediaType::Movie)
            .await
            .unwrap();
    }

    let err = library
        .save_item(&user_id, draft("603", "The Matrix", None))
        .await;
    assert!(matches!(err, Err(AppError::Capacity(_))));

    // The whole operation aborted: no SavedItem row either
    let doc_id = saved_item_doc_id(&user_id, "603", MediaType::Movie);
    assert!(db.get_saved_item(&doc_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_saved_items_listed_most_recent_first() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    library
        .save_item(&user_id, draft("1", "First Save", None))
        .await
        .unwrap();
    library
        .save_item(&user_id, draft("2", "Second Save", None))
        .await
        .unwrap();

    let saved = db.get_saved_items_for_user(&user_id).await.unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].title, "Second Save");
    assert_eq!(saved[1].title, "First Save");
}

// ═══════════════════════════════════════════════════════════════════════════
// USER / ONBOARDING TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_default_collections_created_once() {
    require_emulator!();

    let library = library().await;
    let db = test_db().await;
    let user_id = unique_user_id();

    library.ensure_default_collections(&user_id).await.unwrap();
    library.ensure_default_collections(&user_id).await.unwrap();

    let collections = db.get_collections_for_user(&user_id).await.unwrap();
    let names: Vec<&str> = collections.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Favorites", "Watchlist", "Playing"]);
}

#[tokio::test]
async fn test_username_collision_gets_numeric_suffix() {
    require_emulator!();

    let db = test_db().await;
    let auth = GoogleAuthService::new("id".to_string(), "secret".to_string(), db.clone());

    // Unique local-part so parallel test runs don't collide
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let local = format!("dup{}", &tag[..12]);

    let first = auth
        .find_or_create_user(GoogleUserInfo {
            email: format!("{}@one.example", local),
            name: None,
            picture: None,
        })
        .await
        .unwrap();
    let second = auth
        .find_or_create_user(GoogleUserInfo {
            email: format!("{}@two.example", local),
            name: None,
            picture: None,
        })
        .await
        .unwrap();

    assert_eq!(first.username, local);
    assert_eq!(second.username, format!("{}1", local));

    // Same email signs in again: no new user, same record
    let again = auth
        .find_or_create_user(GoogleUserInfo {
            email: format!("{}@one.example", local),
            name: None,
            picture: None,
        })
        .await
        .unwrap();
    assert_eq!(again.id, first.id);
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, email/username lookups)
//! - Collections (the 9-slot profile grid)
//! - Items (positioned entries inside a collection)
//! - SavedItems (per-user mirror keyed by a composite document ID)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Collection, Item, MediaType, SavedItem, User};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by their ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email (identity-provider key).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.pop())
    }

    /// Find a user by their public username.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let username = username.to_string();
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("username").eq(username.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.pop())
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Collection Operations ───────────────────────────────────

    /// Get a collection by ID.
    pub async fn get_collection(&self, collection_id: &str) -> Result<Option<Collection>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::COLLECTIONS)
            .obj()
            .one(collection_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all of a user's collections, ordered by grid position.
    pub async fn get_collections_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Collection>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::COLLECTIONS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .order_by([(
                "position",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's collection by exact name.
    pub async fn find_collection_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Collection>, AppError> {
        let user_id = user_id.to_string();
        let name = name.to_string();
        let mut found: Vec<Collection> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::COLLECTIONS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("name").eq(name.clone()),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.pop())
    }

    /// Create or update a collection.
    pub async fn set_collection(&self, collection: &Collection) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COLLECTIONS)
            .document_id(&collection.id)
            .object(collection)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a collection and all of its items (cascade).
    ///
    /// Grid positions of the user's other collections are left untouched -
    /// slots are user-arranged and gaps persist until refilled.
    pub async fn delete_collection(&self, collection_id: &str) -> Result<(), AppError> {
        let items = self.get_items_for_collection(collection_id).await?;
        self.batch_delete(&items, collections::ITEMS, |item: &Item| item.id.clone())
            .await?;

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::COLLECTIONS)
            .document_id(collection_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            collection_id,
            item_count = items.len(),
            "Deleted collection and cascaded items"
        );
        Ok(())
    }

    // ─── Item Operations ─────────────────────────────────────────

    /// Get an item by ID.
    pub async fn get_item(&self, item_id: &str) -> Result<Option<Item>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ITEMS)
            .obj()
            .one(item_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a collection's items ordered by position ascending.
    pub async fn get_items_for_collection(
        &self,
        collection_id: &str,
    ) -> Result<Vec<Item>, AppError> {
        let collection_id = collection_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ITEMS)
            .filter(move |q| q.for_all([q.field("collection_id").eq(collection_id.clone())]))
            .order_by([(
                "position",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an item in a collection by its source identity.
    ///
    /// Used by the save-via-swipe path to dedupe on (external_id, type).
    pub async fn find_item_in_collection(
        &self,
        collection_id: &str,
        external_id: &str,
        media_type: MediaType,
    ) -> Result<Option<Item>, AppError> {
        let collection_id = collection_id.to_string();
        let external_id = external_id.to_string();
        let type_str = media_type.as_str().to_string();
        let mut found: Vec<Item> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ITEMS)
            .filter(move |q| {
                q.for_all([
                    q.field("collection_id").eq(collection_id.clone()),
                    q.field("external_id").eq(external_id.clone()),
                    q.field("type").eq(type_str.clone()),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.pop())
    }

    /// Create or update an item.
    pub async fn set_item(&self, item: &Item) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ITEMS)
            .document_id(&item.id)
            .object(item)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Rewrite positions for the given (item, new_position) moves.
    ///
    /// Callers pass only the items whose stored position actually changed,
    /// keeping write volume to the minimum the reindex requires. Writes run
    /// concurrently; each one is independently well-formed.
    pub async fn apply_item_moves(&self, moves: &[(Item, u32)]) -> Result<(), AppError> {
        let client = self.get_client()?;

        stream::iter(moves.to_vec())
            .map(|(mut item, new_position)| async move {
                item.position = new_position;
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::ITEMS)
                    .document_id(&item.id)
                    .object(&item)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok::<_, AppError>(())
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(())
    }

    /// Delete a single item. Siblings are reindexed by the caller.
    pub async fn delete_item(&self, item_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ITEMS)
            .document_id(item_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── SavedItem Operations ────────────────────────────────────

    /// Get a user's saved items, most recent first.
    pub async fn get_saved_items_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<SavedItem>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SAVED_ITEMS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .order_by([(
                "saved_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a saved item by its composite document ID.
    pub async fn get_saved_item(&self, doc_id: &str) -> Result<Option<SavedItem>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SAVED_ITEMS)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Upsert a saved item.
    ///
    /// The composite (user_id, external_id, type) document ID makes this a
    /// single idempotent write: an existing row is overwritten with the
    /// latest title/image/metadata, a missing one is created.
    pub async fn upsert_saved_item(&self, saved: &SavedItem) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SAVED_ITEMS)
            .document_id(saved.doc_id())
            .object(saved)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a saved item by its composite document ID.
    pub async fn delete_saved_item(&self, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SAVED_ITEMS)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}

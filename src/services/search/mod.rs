// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Media metadata search clients.
//!
//! One client per upstream, all normalized to [`SearchResult`]. Every
//! client absorbs its own upstream failures - a provider degrades to a
//! static fallback list or an empty list, and no error ever escapes to
//! the caller. Results are already sanitized for item creation.

pub mod anilist;
pub mod artic;
pub mod books;
pub mod igdb;
pub mod steam;
pub mod tmdb;

use crate::config::Config;
use crate::models::MediaType;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A candidate item from any search provider, shaped for `ItemDraft`.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SearchResult {
    pub external_id: String,
    pub title: String,
    pub image: Option<String>,
    pub year: Option<String>,
    pub rating: Option<f64>,
    /// Source-specific fields (studio, developer, author, genres, ...)
    #[cfg_attr(feature = "binding-generation", ts(type = "any"))]
    pub metadata: Option<serde_json::Value>,
}

/// All search providers, dispatched by media type.
#[derive(Clone)]
pub struct SearchServices {
    tmdb: tmdb::TmdbClient,
    anilist: anilist::AniListClient,
    igdb: igdb::IgdbClient,
    steam: steam::SteamClient,
    books: books::BooksClient,
    artic: artic::ArticClient,
}

impl SearchServices {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tmdb: tmdb::TmdbClient::new(config.tmdb_read_access_token.clone()),
            anilist: anilist::AniListClient::new(),
            igdb: igdb::IgdbClient::new(
                config.igdb_client_id.clone(),
                config.igdb_access_token.clone(),
            ),
            steam: steam::SteamClient::new(),
            books: books::BooksClient::new(config.google_books_key.clone()),
            artic: artic::ArticClient::new(),
        }
    }

    /// Search the provider for a media type. Unsupported types (music,
    /// the advisory `mixed`) return an empty list.
    pub async fn search(&self, media_type: MediaType, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match media_type {
            MediaType::Movie => self.tmdb.search_movies(query).await,
            MediaType::Tv => self.tmdb.search_tv(query).await,
            MediaType::Anime => self.anilist.search(query, anilist::AniListKind::Anime).await,
            MediaType::Manga => self.anilist.search(query, anilist::AniListKind::Manga).await,
            // IGDB needs Twitch credentials; the keyless Steam proxy is
            // the default game source.
            MediaType::Game => {
                if self.igdb.is_configured() {
                    self.igdb.search(query).await
                } else {
                    self.steam.search(query).await
                }
            }
            MediaType::Book => self.books.search(query).await,
            MediaType::Art => self.artic.search(query).await,
            MediaType::Music | MediaType::Mixed => {
                tracing::debug!(media_type = %media_type, "No search provider for type");
                Vec::new()
            }
        }
    }
}

/// Case-insensitive substring filter used by provider fallback lists.
pub(crate) fn filter_by_title<'a, T>(
    entries: &'a [T],
    query: &str,
    title: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|e| title(e).to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_title() {
        let titles = ["The Matrix", "The Matrix Reloaded", "Inception"];
        let hits = filter_by_title(&titles, "matrix", |t| t);
        assert_eq!(hits.len(), 2);
        let hits = filter_by_title(&titles, "INCEPTION", |t| t);
        assert_eq!(hits.len(), 1);
        assert!(filter_by_title(&titles, "zzz", |t| t).is_empty());
    }
}

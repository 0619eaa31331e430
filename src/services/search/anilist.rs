// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AniList GraphQL search client (anime and manga).
//!
//! AniList's search is free and unauthenticated. Failures degrade to an
//! empty list.

use super::SearchResult;
use serde::Deserialize;

const ANILIST_API: &str = "https://graphql.anilist.co";
const PER_PAGE: u32 = 12;

const SEARCH_QUERY: &str = r#"
query ($search: String, $type: MediaType, $perPage: Int) {
  Page(page: 1, perPage: $perPage) {
    media(search: $search, type: $type, sort: POPULARITY_DESC) {
      id
      title { romaji english }
      coverImage { large }
      startDate { year }
      averageScore
      studios { nodes { name } }
      genres
    }
  }
}
"#;

/// Which AniList media kind to query.
#[derive(Debug, Clone, Copy)]
pub enum AniListKind {
    Anime,
    Manga,
}

impl AniListKind {
    fn as_graphql(&self) -> &'static str {
        match self {
            AniListKind::Anime => "ANIME",
            AniListKind::Manga => "MANGA",
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<PageData>,
}

#[derive(Debug, Deserialize)]
struct PageData {
    #[serde(rename = "Page")]
    page: Page,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    id: u64,
    title: Title,
    #[serde(rename = "coverImage")]
    cover_image: Option<CoverImage>,
    #[serde(rename = "startDate")]
    start_date: Option<StartDate>,
    #[serde(rename = "averageScore")]
    average_score: Option<f64>,
    studios: Option<Studios>,
    #[serde(default)]
    genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Title {
    romaji: Option<String>,
    english: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoverImage {
    large: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StartDate {
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Studios {
    #[serde(default)]
    nodes: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

/// AniList API client.
#[derive(Clone)]
pub struct AniListClient {
    http: reqwest::Client,
    api_url: String,
}

impl AniListClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: ANILIST_API.to_string(),
        }
    }

    /// Search anime or manga; degrades to an empty list on failure.
    pub async fn search(&self, query: &str, kind: AniListKind) -> Vec<SearchResult> {
        match self.fetch(query, kind).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, kind = kind.as_graphql(), "AniList search failed");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, query: &str, kind: AniListKind) -> Result<Vec<SearchResult>, String> {
        let body = serde_json::json!({
            "query": SEARCH_QUERY,
            "variables": {
                "search": query,
                "type": kind.as_graphql(),
                "perPage": PER_PAGE,
            }
        });

        let response = self
            .http
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let parsed: GraphQlResponse = response.json().await.map_err(|e| e.to_string())?;
        let media = parsed.data.map(|d| d.page.media).unwrap_or_default();
        Ok(media.into_iter().map(map_media).collect())
    }
}

impl Default for AniListClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_media(media: Media) -> SearchResult {
    // Prefer the English title when AniList has one.
    let title = media
        .title
        .english
        .or(media.title.romaji)
        .unwrap_or_else(|| "Untitled".to_string());

    let studio = media
        .studios
        .as_ref()
        .and_then(|s| s.nodes.first())
        .map(|n| n.name.clone());

    let mut metadata = serde_json::Map::new();
    if let Some(studio) = studio {
        metadata.insert("studio".to_string(), studio.into());
    }
    if !media.genres.is_empty() {
        metadata.insert("genres".to_string(), media.genres.clone().into());
    }

    SearchResult {
        external_id: media.id.to_string(),
        title,
        image: media.cover_image.and_then(|c| c.large),
        year: media.start_date.and_then(|d| d.year).map(|y| y.to_string()),
        rating: media.average_score,
        metadata: (!metadata.is_empty()).then(|| serde_json::Value::Object(metadata)),
    }
}

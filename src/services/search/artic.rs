// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Art Institute of Chicago search client.
//!
//! Public API, no key. Images come from the museum's IIIF server; works
//! without a digitized image are filtered out. Failures degrade to an
//! empty list.

use super::SearchResult;
use serde::Deserialize;

const ART_API: &str = "https://api.artic.edu/api/v1";
const IIIF_BASE: &str = "https://www.artic.edu/iiif/2";
const LIMIT: u32 = 12;

#[derive(Debug, Deserialize)]
struct ArtSearchResponse {
    #[serde(default)]
    data: Vec<ArtWork>,
}

#[derive(Debug, Deserialize)]
struct ArtWork {
    id: u64,
    title: String,
    artist_title: Option<String>,
    date_display: Option<String>,
    medium_display: Option<String>,
    image_id: Option<String>,
}

/// Art Institute of Chicago API client.
#[derive(Clone)]
pub struct ArticClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArticClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: ART_API.to_string(),
        }
    }

    /// Search artworks; degrades to an empty list on failure.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.fetch(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "Art Institute search failed");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<SearchResult>, String> {
        let response = self
            .http
            .get(format!("{}/artworks/search", self.base_url))
            .query(&[
                ("q", query.to_string()),
                ("limit", LIMIT.to_string()),
                (
                    "fields",
                    "id,title,artist_title,date_display,medium_display,image_id".to_string(),
                ),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let body: ArtSearchResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body
            .data
            .into_iter()
            .filter(|art| art.image_id.is_some())
            .map(map_artwork)
            .collect())
    }
}

impl Default for ArticClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_artwork(art: ArtWork) -> SearchResult {
    let mut metadata = serde_json::Map::new();
    if let Some(artist) = &art.artist_title {
        metadata.insert("artist".to_string(), artist.clone().into());
    }
    if let Some(medium) = &art.medium_display {
        metadata.insert("medium".to_string(), medium.clone().into());
    }

    SearchResult {
        external_id: art.id.to_string(),
        title: art.title,
        image: art.image_id.as_deref().map(|id| iiif_url(id, 600)),
        // Date displays are free text ("1884/86", "c. 1503") - passed
        // through untouched as the source-native year.
        year: art.date_display,
        rating: None,
        metadata: (!metadata.is_empty()).then(|| serde_json::Value::Object(metadata)),
    }
}

/// IIIF image URL at the given pixel width.
/// Format: identifier/region/size/rotation/quality.format
pub fn iiif_url(image_id: &str, width: u32) -> String {
    format!("{}/{}/full/{},/0/default.jpg", IIIF_BASE, image_id, width)
}

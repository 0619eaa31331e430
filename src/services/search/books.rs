// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Books search client.
//!
//! Works keyless at a lower quota; an API key raises it. Failures degrade
//! to an empty list.

use super::SearchResult;
use serde::Deserialize;

const GOOGLE_BOOKS_API: &str = "https://www.googleapis.com/books/v1/volumes";
const MAX_RESULTS: u32 = 12;

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: String,
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
struct VolumeInfo {
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
    #[serde(rename = "averageRating")]
    average_rating: Option<f64>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(rename = "imageLinks")]
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
    small: Option<String>,
    medium: Option<String>,
    large: Option<String>,
    #[serde(rename = "extraLarge")]
    extra_large: Option<String>,
}

/// Google Books API client.
#[derive(Clone)]
pub struct BooksClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl BooksClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GOOGLE_BOOKS_API.to_string(),
            api_key,
        }
    }

    /// Search books; degrades to an empty list on failure.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.fetch(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "Google Books search failed");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<SearchResult>, String> {
        let mut request = self
            .http
            .get(&self.base_url)
            .query(&[("q", query.to_string()), ("maxResults", MAX_RESULTS.to_string())]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let body: VolumesResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body.items.into_iter().map(map_volume).collect())
    }
}

fn map_volume(volume: Volume) -> SearchResult {
    let info = volume.volume_info;
    let author = info.authors.first().cloned();

    let mut metadata = serde_json::Map::new();
    if let Some(author) = author {
        metadata.insert("author".to_string(), author.into());
    }
    if !info.categories.is_empty() {
        metadata.insert("genres".to_string(), info.categories.clone().into());
    }

    SearchResult {
        external_id: volume.id,
        title: info.title,
        image: best_cover(info.image_links.as_ref()),
        year: info
            .published_date
            .as_deref()
            .map(|d| d.chars().take(4).collect()),
        rating: info.average_rating,
        metadata: (!metadata.is_empty()).then(|| serde_json::Value::Object(metadata)),
    }
}

/// Best-quality cover URL, upgraded to HTTPS and a larger zoom.
fn best_cover(links: Option<&ImageLinks>) -> Option<String> {
    let links = links?;
    let url = links
        .extra_large
        .as_ref()
        .or(links.large.as_ref())
        .or(links.medium.as_ref())
        .or(links.small.as_ref())
        .or(links.thumbnail.as_ref())?;

    Some(url.replace("http://", "https://").replace("zoom=1", "zoom=2"))
}

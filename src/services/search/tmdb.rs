// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TMDB search client (movies and TV).
//!
//! Uses Bearer authentication with a read access token. Without a token,
//! or on any upstream failure, degrades to a static fallback set so demo
//! mode works with no credentials at all.

use super::{filter_by_title, SearchResult};
use serde::Deserialize;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// TMDB API client.
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    read_access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbEntry>,
}

/// One movie or TV entry; movie and TV payloads differ in field names.
#[derive(Debug, Deserialize)]
struct TmdbEntry {
    id: u64,
    // Movies use `title`/`release_date`, TV uses `name`/`first_air_date`.
    title: Option<String>,
    name: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

impl TmdbClient {
    pub fn new(read_access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: TMDB_BASE_URL.to_string(),
            read_access_token,
        }
    }

    /// Search movies, falling back to the static list on any failure.
    pub async fn search_movies(&self, query: &str) -> Vec<SearchResult> {
        match self.fetch(query, "movie").await {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => fallback_movies(query),
            Err(e) => {
                tracing::warn!(error = %e, "TMDB movie search failed, using fallback");
                fallback_movies(query)
            }
        }
    }

    /// Search TV shows. No fallback set - degrades to empty.
    pub async fn search_tv(&self, query: &str) -> Vec<SearchResult> {
        match self.fetch(query, "tv").await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "TMDB TV search failed");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, query: &str, kind: &str) -> Result<Vec<SearchResult>, String> {
        let token = self
            .read_access_token
            .as_deref()
            .ok_or_else(|| "TMDB token not configured".to_string())?;

        let url = format!("{}/search/{}", self.base_url, kind);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("query", query), ("include_adult", "false")])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let body: TmdbSearchResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body.results.into_iter().map(map_entry).collect())
    }
}

fn map_entry(entry: TmdbEntry) -> SearchResult {
    let title = entry
        .title
        .or(entry.name)
        .unwrap_or_else(|| "Untitled".to_string());
    let date = entry.release_date.or(entry.first_air_date);

    SearchResult {
        external_id: entry.id.to_string(),
        title,
        image: poster_url(entry.poster_path.as_deref(), "w500"),
        year: date.as_deref().and_then(year_of),
        rating: entry.vote_average,
        metadata: (!entry.genre_ids.is_empty())
            .then(|| serde_json::json!({ "genre_ids": entry.genre_ids })),
    }
}

/// Full poster URL for a TMDB poster path, or None without one.
pub fn poster_url(path: Option<&str>, size: &str) -> Option<String> {
    path.map(|p| format!("{}/{}{}", TMDB_IMAGE_BASE, size, p))
}

/// Leading year of a TMDB date string ("1999-03-30" -> "1999").
fn year_of(date: &str) -> Option<String> {
    let year = date.split('-').next()?;
    (year.len() == 4).then(|| year.to_string())
}

/// Fallback movies for demo mode (no API key).
fn fallback_movies(query: &str) -> Vec<SearchResult> {
    const FALLBACK: &[(&str, &str, &str, &str, f64)] = &[
        ("603", "The Matrix", "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg", "1999", 8.7),
        ("155", "The Dark Knight", "/qJ2tW6WMUDux911r6m7haRef0WH.jpg", "2008", 9.0),
        ("27205", "Inception", "/edv5CZvWj09upOsy2Y6IwDhK8bt.jpg", "2010", 8.8),
        ("157336", "Interstellar", "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg", "2014", 8.7),
        ("680", "Pulp Fiction", "/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg", "1994", 8.9),
        ("278", "The Shawshank Redemption", "/9cqNxx0GxF0bflZmeSMuL5tnGzr.jpg", "1994", 9.3),
        ("238", "The Godfather", "/3bhkrj58Vtu7enYsRolD1fZdja1.jpg", "1972", 9.2),
        ("872585", "Oppenheimer", "/8Gxv8gSFCU0XGDykEGv7zR1n2ua.jpg", "2023", 8.1),
    ];

    filter_by_title(FALLBACK, query, |e| e.1)
        .into_iter()
        .map(|(id, title, poster, year, rating)| SearchResult {
            external_id: (*id).to_string(),
            title: (*title).to_string(),
            image: poster_url(Some(poster), "w500"),
            year: Some((*year).to_string()),
            rating: Some(*rating),
            metadata: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url() {
        assert_eq!(
            poster_url(Some("/abc.jpg"), "w500").unwrap(),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert!(poster_url(None, "w500").is_none());
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of("1999-03-30").unwrap(), "1999");
        assert!(year_of("").is_none());
    }

    #[test]
    fn test_map_entry_movie_fields() {
        let json = serde_json::json!({
            "id": 603,
            "title": "The Matrix",
            "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
            "release_date": "1999-03-30",
            "vote_average": 8.7,
            "genre_ids": [28, 878]
        });
        let entry: TmdbEntry = serde_json::from_value(json).unwrap();
        let result = map_entry(entry);

        assert_eq!(result.external_id, "603");
        assert_eq!(result.title, "The Matrix");
        assert_eq!(result.year.as_deref(), Some("1999"));
        assert_eq!(result.rating, Some(8.7));
        assert!(result.image.unwrap().ends_with(".jpg"));
    }

    #[test]
    fn test_map_entry_tv_fields() {
        let json = serde_json::json!({
            "id": 1396,
            "name": "Breaking Bad",
            "poster_path": null,
            "first_air_date": "2008-01-20",
            "vote_average": 8.9
        });
        let entry: TmdbEntry = serde_json::from_value(json).unwrap();
        let result = map_entry(entry);

        assert_eq!(result.title, "Breaking Bad");
        assert_eq!(result.year.as_deref(), Some("2008"));
        assert!(result.image.is_none());
    }

    #[test]
    fn test_fallback_filters_by_query() {
        let hits = fallback_movies("matrix");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "The Matrix");
        assert!(fallback_movies("nonexistent").is_empty());
    }
}

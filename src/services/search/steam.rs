// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Game search via the rawg2steam proxy.
//!
//! A RAWG-compatible API backed by Steam CDN images, no key required.
//! Upstream failure or an empty result degrades to a static fallback set.

use super::{filter_by_title, SearchResult};
use serde::Deserialize;

const STEAM_API: &str = "https://rawg2steam.phalco.de/api";

#[derive(Debug, Deserialize)]
struct SteamSearchResponse {
    #[serde(default)]
    results: Vec<SteamGame>,
}

#[derive(Debug, Deserialize)]
struct SteamGame {
    id: u64,
    name: String,
    background_image: Option<String>,
    box_art: Option<String>,
    released: Option<String>,
    rating: Option<f64>,
    #[serde(default)]
    developers: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

/// rawg2steam proxy client.
#[derive(Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    base_url: String,
}

impl SteamClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: STEAM_API.to_string(),
        }
    }

    /// Search games; degrades to the fallback set on failure.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.fetch(query).await {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => fallback_games(query),
            Err(e) => {
                tracing::warn!(error = %e, "Steam game search failed, using fallback");
                fallback_games(query)
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<SearchResult>, String> {
        let response = self
            .http
            .get(format!("{}/games", self.base_url))
            .query(&[("search", query)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let body: SteamSearchResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body.results.into_iter().map(map_game).collect())
    }
}

impl Default for SteamClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_game(game: SteamGame) -> SearchResult {
    let developer = game.developers.first().map(|d| d.name.clone());

    SearchResult {
        external_id: game.id.to_string(),
        title: game.name,
        // Box art is portrait like every other media cover; the wide
        // background image is the backstop.
        image: game.box_art.or(game.background_image),
        year: game
            .released
            .as_deref()
            .and_then(|d| d.split('-').next())
            .map(str::to_string),
        rating: game.rating,
        metadata: developer.map(|d| serde_json::json!({ "developer": d })),
    }
}

/// Fallback games when the proxy is unreachable.
fn fallback_games(query: &str) -> Vec<SearchResult> {
    const FALLBACK: &[(&str, &str, &str)] = &[
        ("3498", "Grand Theft Auto V", "2013"),
        ("3328", "The Witcher 3: Wild Hunt", "2015"),
        ("28", "Red Dead Redemption 2", "2018"),
        ("4200", "Portal 2", "2011"),
        ("5286", "Tomb Raider", "2013"),
        ("13536", "Portal", "2007"),
    ];

    filter_by_title(FALLBACK, query, |e| e.1)
        .into_iter()
        .map(|(id, title, year)| SearchResult {
            external_id: (*id).to_string(),
            title: (*title).to_string(),
            image: None,
            year: Some((*year).to_string()),
            rating: None,
            metadata: None,
        })
        .collect()
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! IGDB game search client.
//!
//! IGDB authenticates through Twitch OAuth. Without credentials the
//! client reports unconfigured and the dispatcher routes game searches to
//! the keyless Steam proxy instead.

use super::SearchResult;
use serde::Deserialize;

const IGDB_API: &str = "https://api.igdb.com/v4";

#[derive(Debug, Deserialize)]
struct IgdbGame {
    id: u64,
    name: String,
    cover: Option<IgdbCover>,
    first_release_date: Option<i64>,
    rating: Option<f64>,
    #[serde(default)]
    involved_companies: Vec<InvolvedCompany>,
    #[serde(default)]
    genres: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct IgdbCover {
    image_id: String,
}

#[derive(Debug, Deserialize)]
struct InvolvedCompany {
    company: Named,
    #[serde(default)]
    developer: bool,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

/// IGDB API client.
#[derive(Clone)]
pub struct IgdbClient {
    http: reqwest::Client,
    api_url: String,
    client_id: Option<String>,
    access_token: Option<String>,
}

impl IgdbClient {
    pub fn new(client_id: Option<String>, access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: IGDB_API.to_string(),
            client_id,
            access_token,
        }
    }

    /// Whether Twitch credentials were provided.
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.access_token.is_some()
    }

    /// Search games; degrades to an empty list without credentials or on
    /// upstream failure.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let (Some(client_id), Some(token)) = (&self.client_id, &self.access_token) else {
            tracing::warn!("IGDB credentials not configured");
            return Vec::new();
        };

        match self.fetch(query, client_id, token).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "IGDB search failed");
                Vec::new()
            }
        }
    }

    async fn fetch(
        &self,
        query: &str,
        client_id: &str,
        token: &str,
    ) -> Result<Vec<SearchResult>, String> {
        // IGDB takes its query language as a plain-text body.
        let body = format!(
            "search \"{}\"; fields name, cover.image_id, first_release_date, rating, \
             involved_companies.company.name, involved_companies.developer, genres.name; \
             limit 12;",
            query.replace('"', "")
        );

        let response = self
            .http
            .post(format!("{}/games", self.api_url))
            .header("Client-ID", client_id)
            .bearer_auth(token)
            .header("Content-Type", "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let games: Vec<IgdbGame> = response.json().await.map_err(|e| e.to_string())?;
        Ok(games.into_iter().map(map_game).collect())
    }
}

fn map_game(game: IgdbGame) -> SearchResult {
    let developer = game
        .involved_companies
        .iter()
        .find(|c| c.developer)
        .map(|c| c.company.name.clone());

    let mut metadata = serde_json::Map::new();
    if let Some(developer) = developer {
        metadata.insert("developer".to_string(), developer.into());
    }
    if !game.genres.is_empty() {
        let genres: Vec<String> = game.genres.iter().map(|g| g.name.clone()).collect();
        metadata.insert("genres".to_string(), genres.into());
    }

    SearchResult {
        external_id: game.id.to_string(),
        title: game.name,
        image: game.cover.map(|c| cover_url(&c.image_id, "cover_big")),
        year: game.first_release_date.and_then(year_from_unix),
        rating: game.rating,
        metadata: (!metadata.is_empty()).then(|| serde_json::Value::Object(metadata)),
    }
}

/// Cover image URL for an IGDB image ID.
pub fn cover_url(image_id: &str, size: &str) -> String {
    format!(
        "https://images.igdb.com/igdb/image/upload/t_{}/{}.jpg",
        size, image_id
    )
}

fn year_from_unix(timestamp: i64) -> Option<String> {
    chrono::DateTime::from_timestamp(timestamp, 0).map(|dt| dt.format("%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_url() {
        assert_eq!(
            cover_url("co1wyy", "cover_big"),
            "https://images.igdb.com/igdb/image/upload/t_cover_big/co1wyy.jpg"
        );
    }

    #[test]
    fn test_year_from_unix() {
        // 2017-03-03 (Breath of the Wild release)
        assert_eq!(year_from_unix(1_488_499_200).unwrap(), "2017");
    }

    #[test]
    fn test_unconfigured_client() {
        let client = IgdbClient::new(None, None);
        assert!(!client.is_configured());
    }

    #[test]
    fn test_map_game_picks_developer() {
        let json = serde_json::json!({
            "id": 7346,
            "name": "The Legend of Zelda: Breath of the Wild",
            "cover": { "image_id": "co3p2d" },
            "first_release_date": 1488499200i64,
            "rating": 92.5,
            "involved_companies": [
                { "company": { "name": "Nintendo EPD" }, "developer": true },
                { "company": { "name": "Nintendo" }, "developer": false }
            ],
            "genres": [{ "name": "Adventure" }]
        });
        let game: IgdbGame = serde_json::from_value(json).unwrap();
        let result = map_game(game);

        assert_eq!(result.external_id, "7346");
        assert_eq!(result.year.as_deref(), Some("2017"));
        let metadata = result.metadata.unwrap();
        assert_eq!(metadata["developer"], "Nintendo EPD");
    }
}

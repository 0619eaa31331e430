// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Media type and profile texture enums shared across models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Media domain of an item or (advisorily) a collection.
///
/// A collection's type is a display hint only; items carry their own type
/// and a collection may hold a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Music,
    Game,
    Anime,
    Manga,
    Book,
    Art,
    /// Advisory collection type for mixed-content collections.
    Mixed,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Music => "music",
            MediaType::Game => "game",
            MediaType::Anime => "anime",
            MediaType::Manga => "manga",
            MediaType::Book => "book",
            MediaType::Art => "art",
            MediaType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            "music" => Ok(MediaType::Music),
            "game" => Ok(MediaType::Game),
            "anime" => Ok(MediaType::Anime),
            "manga" => Ok(MediaType::Manga),
            "book" => Ok(MediaType::Book),
            "art" => Ok(MediaType::Art),
            "mixed" => Ok(MediaType::Mixed),
            _ => Err(()),
        }
    }
}

/// Background texture for a user's profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum TextureType {
    #[default]
    None,
    Grain,
    Paper,
    Glass,
}

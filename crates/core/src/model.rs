//! Unified content model.
//!
//! Every catalog response is normalized into these types before it leaves
//! the API, whatever upstream produced it. Poster and backdrop URLs are
//! always local image-proxy paths (see [`crate::images`]).

use serde::{Deserialize, Serialize};

use crate::source::Source;
use crate::types::MediaType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedGenre {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedCastMember {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub character: String,
}

/// Cross-catalog identifiers. `imdb` is the bridge between catalogs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedExternalIds {
    pub kp: Option<i64>,
    pub tmdb: Option<i64>,
    pub imdb: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedEpisode {
    pub id: String,
    pub source_id: String,
    pub name: String,
    pub episode_number: i32,
    pub season_number: i32,
    pub air_date: String,
    pub duration: i32,
    pub description: String,
    pub still_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSeason {
    pub id: String,
    pub source_id: String,
    pub name: String,
    pub season_number: i32,
    pub episode_count: i32,
    pub release_date: String,
    pub poster_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub episodes: Vec<UnifiedEpisode>,
}

/// A movie or TV series in source-agnostic form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedContent {
    /// Identifier native to the producing catalog.
    pub id: String,
    /// `<source>_<id>`; the canonical external handle.
    pub source_id: String,
    pub title: String,
    pub original_title: String,
    pub description: String,
    pub release_date: String,
    /// Last air date, TV only.
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub genres: Vec<UnifiedGenre>,
    pub rating: f64,
    pub poster_url: String,
    pub backdrop_url: String,
    pub director: String,
    pub cast: Vec<UnifiedCastMember>,
    /// Runtime in minutes.
    pub duration: i32,
    pub country: String,
    pub language: String,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub imdb_id: String,
    pub external_ids: UnifiedExternalIds,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<UnifiedSeason>,
}

impl UnifiedContent {
    /// The catalog encoded in [`source_id`](Self::source_id).
    pub fn source(&self) -> Option<Source> {
        self.source_id
            .split_once('_')
            .and_then(|(prefix, _)| prefix.parse().ok())
    }
}

/// List projection of [`UnifiedContent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSearchItem {
    pub id: String,
    pub source_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Upstream type tag before normalization (e.g. `TV_SERIES`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_type: String,
    pub release_date: String,
    pub poster_url: String,
    pub rating: f64,
    pub description: String,
    pub external_ids: UnifiedExternalIds,
}

/// One page of unified search results plus upstream paging totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedPage {
    pub items: Vec<UnifiedSearchItem>,
    pub page: i64,
    pub total_pages: i64,
    pub total_results: i64,
}

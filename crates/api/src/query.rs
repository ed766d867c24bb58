//! Shared query parameter types for API handlers.
//!
//! Values arrive as strings and are parsed leniently: a malformed `page`
//! falls back to 1, a malformed `year` or `season` is ignored. Strict
//! validation happens where a bad value must produce a 400.

use neomovies_core::source::normalize_language;
use serde::Deserialize;

/// Query parameters shared by catalog endpoints
/// (`?query=&page=&lang=&region=&year=&source=&id_type=`).
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub query: Option<String>,
    pub page: Option<String>,
    pub lang: Option<String>,
    /// Alias of `lang`.
    pub language: Option<String>,
    pub region: Option<String>,
    pub year: Option<String>,
    pub source: Option<String>,
    /// Catalog a bare id belongs to; wins over `source`.
    #[serde(alias = "idType")]
    pub id_type: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

impl CatalogParams {
    /// Page number, at least 1.
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }

    /// Normalized language (`ru-RU` or `en-US`).
    pub fn language(&self) -> &'static str {
        normalize_language(self.lang.as_deref().or(self.language.as_deref()))
    }

    pub fn year(&self) -> Option<i32> {
        parse_positive(self.year.as_deref())
    }

    /// Trimmed search text, `None` when blank.
    pub fn search_text(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    pub fn region(&self) -> Option<&str> {
        non_blank(self.region.as_deref())
    }

    /// Explicitly requested catalog, `id_type` first, then `source`.
    pub fn explicit_source(&self) -> Option<&str> {
        non_blank(self.id_type.as_deref()).or_else(|| non_blank(self.source.as_deref()))
    }
}

/// `?season=&episode=&translation=` for player endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct EpisodeParams {
    pub season: Option<String>,
    pub episode: Option<String>,
    pub translation: Option<String>,
}

impl EpisodeParams {
    pub fn season(&self) -> Option<i32> {
        parse_positive(self.season.as_deref())
    }

    pub fn episode(&self) -> Option<i32> {
        parse_positive(self.episode.as_deref())
    }
}

/// `?type=movie|tv` for favorites and category media.
#[derive(Debug, Default, Deserialize)]
pub struct MediaTypeParams {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

// ---- parsing helpers ----

pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// A strictly positive integer, or `None`.
pub fn parse_positive(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|v| *v > 0)
}

/// `true`/`1`/`yes` or `false`/`0`/`no`; anything else is `None`.
pub fn parse_bool(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated list, dropping blank entries.
pub fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

//! Kinopoisk (secondary catalog) payloads.
//!
//! The unofficial API serves two schema generations. List endpoints answer
//! either `{items, totalPages, total}` (v2.2) or `{films, pagesCount,
//! searchFilmsCountResult}` (v2.1); [`parse_film_page`] accepts both.
//! Numeric fields may arrive as numbers, strings or `null`.

use serde::{Deserialize, Serialize};

use crate::flexible::{flexible_f64, flexible_i32, flexible_i64, flexible_string};
use crate::types::MediaType;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KpCountry {
    #[serde(default, deserialize_with = "flexible_string")]
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KpGenre {
    #[serde(default, deserialize_with = "flexible_string")]
    pub genre: String,
}

/// `GET /v2.2/films/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpFilm {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub kinopoisk_id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub imdb_id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name_ru: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name_en: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name_original: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub poster_url: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub poster_url_preview: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub cover_url: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub rating_kinopoisk: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub rating_imdb: f64,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub year: i32,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub film_length: i32,
    #[serde(default, deserialize_with = "flexible_string")]
    pub slogan: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub description: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub short_description: String,
    #[serde(default, rename = "type", deserialize_with = "flexible_string")]
    pub film_type: String,
    #[serde(default)]
    pub countries: Vec<KpCountry>,
    #[serde(default)]
    pub genres: Vec<KpGenre>,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub start_year: i32,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub end_year: i32,
    #[serde(default)]
    pub serial: Option<bool>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Row of a search or collection list.
///
/// v2.2 rows carry `kinopoiskId` and numeric `ratingKinopoisk`; v2.1 rows
/// carry `filmId` and a string `rating` such as `"8.9"` or `"99%"`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpFilmShort {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub kinopoisk_id: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub film_id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub imdb_id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name_ru: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name_en: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name_original: String,
    #[serde(default, rename = "type", deserialize_with = "flexible_string")]
    pub film_type: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub year: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub description: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub rating: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub rating_kinopoisk: f64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub poster_url: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub poster_url_preview: String,
    #[serde(default)]
    pub countries: Vec<KpCountry>,
    #[serde(default)]
    pub genres: Vec<KpGenre>,
}

impl KpFilmShort {
    /// `kinopoiskId`, falling back to the legacy `filmId`.
    pub fn native_id(&self) -> i64 {
        if self.kinopoisk_id != 0 {
            self.kinopoisk_id
        } else {
            self.film_id
        }
    }
}

/// One entry of `GET /v2.2/films/{id}/external_sources`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpExternalSource {
    #[serde(default, deserialize_with = "flexible_string")]
    pub source: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub platform: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KpExternalSources {
    #[serde(default)]
    pub items: Vec<KpExternalSource>,
}

/// `GET /v2.2/films?imdbId=...`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KpFilmSearchByImdb {
    #[serde(default)]
    pub items: Vec<KpFilm>,
}

/// A page of films in whichever schema generation the upstream used.
#[derive(Debug, Clone, Default)]
pub struct KpFilmPage {
    pub films: Vec<KpFilmShort>,
    pub total_pages: i64,
    pub total: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KpPageV22 {
    items: Vec<KpFilmShort>,
    #[serde(default, deserialize_with = "flexible_i64")]
    total_pages: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    total: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KpPageV21 {
    #[serde(default)]
    films: Vec<KpFilmShort>,
    #[serde(default, deserialize_with = "flexible_i64")]
    pages_count: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    search_films_count_result: i64,
}

/// Decode a list page, trying the v2.2 shape before the v2.1 one.
pub fn parse_film_page(body: &[u8]) -> Result<KpFilmPage, serde_json::Error> {
    if let Ok(page) = serde_json::from_slice::<KpPageV22>(body) {
        return Ok(KpFilmPage {
            total: if page.total > 0 {
                page.total
            } else {
                page.items.len() as i64
            },
            films: page.items,
            total_pages: page.total_pages,
        });
    }

    let page = serde_json::from_slice::<KpPageV21>(body)?;
    let total_pages = if page.pages_count == 0 && !page.films.is_empty() {
        1
    } else {
        page.pages_count
    };
    Ok(KpFilmPage {
        total: if page.search_films_count_result > 0 {
            page.search_films_count_result
        } else {
            page.films.len() as i64
        },
        films: page.films,
        total_pages,
    })
}

/// Map an upstream type tag to the unified media type.
///
/// `TV_SERIES`, `MINI_SERIES` or the `serial` flag mean a series.
pub fn media_type_of(film_type: &str, serial: Option<bool>) -> MediaType {
    if serial == Some(true) {
        return MediaType::Tv;
    }
    match film_type.trim().to_ascii_uppercase().as_str() {
        "TV_SERIES" | "MINI_SERIES" => MediaType::Tv,
        _ => MediaType::Movie,
    }
}

/// Collection names accepted by `GET /v2.2/films/top`.
pub const KP_TOP_TYPES: [&str; 3] = [
    "TOP_100_POPULAR_FILMS",
    "TOP_250_BEST_FILMS",
    "TOP_AWAIT_FILMS",
];

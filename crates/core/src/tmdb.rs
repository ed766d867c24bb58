//! TMDB (primary catalog) payloads.
//!
//! Only the fields the mappers read are modelled. Nullable strings decode
//! to `""` and numbers go through [`crate::flexible`] so a schema drift in
//! one field never rejects a whole response.

use serde::{Deserialize, Serialize};

use crate::flexible::{flexible_f64, flexible_i32, flexible_i64, flexible_string};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbGenre {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbProductionCountry {
    #[serde(default, rename = "iso_3166_1", deserialize_with = "flexible_string")]
    pub iso_3166_1: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
}

/// `GET /movie/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbMovie {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub title: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub original_title: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub overview: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub poster_path: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub backdrop_path: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub release_date: String,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub original_language: String,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub runtime: i32,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub budget: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub revenue: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub imdb_id: String,
    #[serde(default)]
    pub production_countries: Vec<TmdbProductionCountry>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbSeasonSummary {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub season_number: i32,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub episode_count: i32,
    #[serde(default, deserialize_with = "flexible_string")]
    pub air_date: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub poster_path: String,
}

/// `GET /tv/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbTvShow {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub original_name: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub overview: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub poster_path: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub backdrop_path: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub first_air_date: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub last_air_date: String,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub original_language: String,
    #[serde(default)]
    pub episode_run_time: Vec<i32>,
    #[serde(default)]
    pub production_countries: Vec<TmdbProductionCountry>,
    #[serde(default)]
    pub seasons: Vec<TmdbSeasonSummary>,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub number_of_seasons: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbEpisode {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub episode_number: i32,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub season_number: i32,
    #[serde(default, deserialize_with = "flexible_string")]
    pub air_date: String,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub runtime: i32,
    #[serde(default, deserialize_with = "flexible_string")]
    pub overview: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub still_path: String,
}

/// `GET /tv/{id}/season/{n}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbSeasonDetails {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "flexible_i32")]
    pub season_number: i32,
    #[serde(default)]
    pub episodes: Vec<TmdbEpisode>,
}

/// `GET /{movie|tv}/{id}/external_ids`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbExternalIds {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub imdb_id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub tvdb_id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub facebook_id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub instagram_id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub twitter_id: String,
}

/// A row in any paged TMDB list (search, popular, discover, multi, ...).
///
/// Movies fill `title`/`release_date`; series fill `name`/`first_air_date`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbListItem {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub media_type: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub title: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub original_title: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub original_name: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub overview: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub poster_path: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub backdrop_path: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub release_date: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub first_air_date: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub vote_average: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbPage {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub page: i64,
    #[serde(default)]
    pub results: Vec<TmdbListItem>,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub total_pages: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub total_results: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbFindIdRow {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub title: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub original_title: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub original_name: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub release_date: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub first_air_date: String,
}

/// `GET /find/{external_id}?external_source=imdb_id`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbFindResult {
    #[serde(default)]
    pub movie_results: Vec<TmdbFindIdRow>,
    #[serde(default)]
    pub tv_results: Vec<TmdbFindIdRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_paths_decode_to_empty_strings() {
        let movie: TmdbMovie = serde_json::from_str(
            r#"{"id": 278, "title": "The Shawshank Redemption", "poster_path": null,
                "backdrop_path": null, "runtime": null, "budget": 25000000}"#,
        )
        .unwrap();
        assert_eq!(movie.id, 278);
        assert_eq!(movie.poster_path, "");
        assert_eq!(movie.runtime, 0);
        assert_eq!(movie.budget, 25_000_000);
    }

    #[test]
    fn find_result_tolerates_missing_lists() {
        let found: TmdbFindResult =
            serde_json::from_str(r#"{"movie_results": [{"id": 278}]}"#).unwrap();
        assert_eq!(found.movie_results[0].id, 278);
        assert!(found.tv_results.is_empty());
    }
}

//! Client for the primary catalog (TMDB v3).
//!
//! Authenticates with a bearer access token. Every call sends the already
//! normalized language (`ru-RU` / `en-US`).

use std::time::Duration;

use neomovies_core::tmdb::{
    TmdbExternalIds, TmdbFindResult, TmdbGenreList, TmdbMovie, TmdbPage, TmdbSeasonDetails,
    TmdbTvShow,
};
use neomovies_core::types::MediaType;
use serde::de::DeserializeOwned;

use crate::error::{build_client, parse_json, ProviderResult};

const PROVIDER: &str = "TMDB";

/// Movie list collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieList {
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
}

impl MovieList {
    fn path(self) -> &'static str {
        match self {
            MovieList::Popular => "movie/popular",
            MovieList::TopRated => "movie/top_rated",
            MovieList::Upcoming => "movie/upcoming",
            MovieList::NowPlaying => "movie/now_playing",
        }
    }
}

/// TV list collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvList {
    Popular,
    TopRated,
    OnTheAir,
    AiringToday,
}

impl TvList {
    fn path(self) -> &'static str {
        match self {
            TvList::Popular => "tv/popular",
            TvList::TopRated => "tv/top_rated",
            TvList::OnTheAir => "tv/on_the_air",
            TvList::AiringToday => "tv/airing_today",
        }
    }
}

/// Per-title related lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Related {
    Recommendations,
    Similar,
}

impl Related {
    fn segment(self) -> &'static str {
        match self {
            Related::Recommendations => "recommendations",
            Related::Similar => "similar",
        }
    }
}

/// HTTP client for the TMDB API.
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl TmdbClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.themoviedb.org/3";
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: String, access_token: String) -> ProviderResult<Self> {
        Ok(Self::with_client(
            build_client(Self::TIMEOUT)?,
            base_url,
            access_token,
        ))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, access_token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    // ---- search ----

    pub async fn search_movies(
        &self,
        query: &str,
        page: u32,
        language: &str,
        region: Option<&str>,
        year: Option<i32>,
    ) -> ProviderResult<TmdbPage> {
        let mut params = search_params(query, page, language);
        if let Some(region) = region.filter(|r| !r.is_empty()) {
            params.push(("region", region.to_string()));
        }
        if let Some(year) = year.filter(|y| *y > 0) {
            params.push(("year", year.to_string()));
        }
        self.get("search/movie", &params).await
    }

    pub async fn search_tv(
        &self,
        query: &str,
        page: u32,
        language: &str,
        year: Option<i32>,
    ) -> ProviderResult<TmdbPage> {
        let mut params = search_params(query, page, language);
        if let Some(year) = year.filter(|y| *y > 0) {
            params.push(("first_air_date_year", year.to_string()));
        }
        self.get("search/tv", &params).await
    }

    /// Multi search with people and untitled rows removed.
    ///
    /// `total_results` is replaced with the number of rows kept.
    pub async fn search_multi(
        &self,
        query: &str,
        page: u32,
        language: &str,
    ) -> ProviderResult<TmdbPage> {
        let params = search_params(query, page, language);
        let page: TmdbPage = self.get("search/multi", &params).await?;
        Ok(filter_multi(page))
    }

    // ---- details ----

    pub async fn get_movie(&self, id: i64, language: &str) -> ProviderResult<TmdbMovie> {
        self.get(&format!("movie/{id}"), &[("language", language.to_string())])
            .await
    }

    pub async fn get_tv(&self, id: i64, language: &str) -> ProviderResult<TmdbTvShow> {
        self.get(&format!("tv/{id}"), &[("language", language.to_string())])
            .await
    }

    pub async fn get_season(
        &self,
        tv_id: i64,
        season: i32,
        language: &str,
    ) -> ProviderResult<TmdbSeasonDetails> {
        self.get(
            &format!("tv/{tv_id}/season/{season}"),
            &[("language", language.to_string())],
        )
        .await
    }

    pub async fn external_ids(
        &self,
        media_type: MediaType,
        id: i64,
    ) -> ProviderResult<TmdbExternalIds> {
        self.get(&format!("{media_type}/{id}/external_ids"), &[])
            .await
    }

    pub async fn genres(&self, media_type: MediaType, language: &str) -> ProviderResult<TmdbGenreList> {
        self.get(
            &format!("genre/{media_type}/list"),
            &[("language", language.to_string())],
        )
        .await
    }

    // ---- cross-walk ----

    /// `GET /find/{imdb}?external_source=imdb_id`.
    pub async fn find_by_imdb(&self, imdb_id: &str, language: &str) -> ProviderResult<TmdbFindResult> {
        self.get(
            &format!("find/{}", urlencoding::encode(imdb_id)),
            &[
                ("external_source", "imdb_id".to_string()),
                ("language", language.to_string()),
            ],
        )
        .await
    }

    /// Resolve an IMDb id to a TMDB id of the given media type.
    ///
    /// `Ok(None)` when the lookup succeeds but has no row of that type.
    pub async fn find_tmdb_id(
        &self,
        imdb_id: &str,
        media_type: MediaType,
        language: &str,
    ) -> ProviderResult<Option<i64>> {
        let found = self.find_by_imdb(imdb_id, language).await?;
        let rows = match media_type {
            MediaType::Movie => &found.movie_results,
            MediaType::Tv => &found.tv_results,
        };
        Ok(rows.first().map(|row| row.id).filter(|id| *id > 0))
    }

    // ---- lists ----

    pub async fn movie_list(
        &self,
        list: MovieList,
        page: u32,
        language: &str,
        region: Option<&str>,
    ) -> ProviderResult<TmdbPage> {
        let mut params = page_params(page, language);
        if let Some(region) = region.filter(|r| !r.is_empty()) {
            params.push(("region", region.to_string()));
        }
        self.get(list.path(), &params).await
    }

    pub async fn tv_list(&self, list: TvList, page: u32, language: &str) -> ProviderResult<TmdbPage> {
        self.get(list.path(), &page_params(page, language)).await
    }

    pub async fn related(
        &self,
        media_type: MediaType,
        id: i64,
        related: Related,
        page: u32,
        language: &str,
    ) -> ProviderResult<TmdbPage> {
        self.get(
            &format!("{media_type}/{id}/{}", related.segment()),
            &page_params(page, language),
        )
        .await
    }

    /// `GET /discover/{type}` by genre, most popular first.
    pub async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: i64,
        page: u32,
        language: &str,
    ) -> ProviderResult<TmdbPage> {
        let mut params = page_params(page, language);
        params.push(("with_genres", genre_id.to_string()));
        params.push(("sort_by", "popularity.desc".to_string()));
        self.get(&format!("discover/{media_type}"), &params).await
    }

    // ---- private helpers ----

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ProviderResult<T> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        parse_json(PROVIDER, response).await
    }
}

fn page_params(page: u32, language: &str) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.max(1).to_string()),
        ("language", language.to_string()),
    ]
}

fn search_params(query: &str, page: u32, language: &str) -> Vec<(&'static str, String)> {
    let mut params = page_params(page, language);
    params.push(("query", query.to_string()));
    params.push(("include_adult", "false".to_string()));
    params
}

/// Keep movie rows with a title and tv rows with a name.
fn filter_multi(mut page: TmdbPage) -> TmdbPage {
    page.results.retain(|row| match row.media_type.as_str() {
        "movie" => !row.title.is_empty(),
        "tv" => !row.name.is_empty(),
        _ => false,
    });
    page.total_results = page.results.len() as i64;
    page
}

//! Client for the secondary catalog (the unofficial Kinopoisk API).

use std::time::Duration;

use neomovies_core::kinopoisk::{
    parse_film_page, KpExternalSource, KpExternalSources, KpFilm, KpFilmPage,
    KpFilmSearchByImdb,
};

use crate::error::{build_client, decode, read_bytes, ProviderError, ProviderResult};

const PROVIDER: &str = "Kinopoisk";

/// HTTP client for `kinopoiskapiunofficial.tech`.
pub struct KpClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl KpClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://kinopoiskapiunofficial.tech/api";
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: String, api_key: String) -> ProviderResult<Self> {
        Ok(Self::with_client(
            build_client(Self::TIMEOUT)?,
            base_url,
            api_key,
        ))
    }

    pub fn with_client(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// `GET /v2.2/films/{id}`.
    pub async fn get_film(&self, id: i64) -> ProviderResult<KpFilm> {
        let body = self.get(&format!("v2.2/films/{id}"), &[]).await?;
        decode(PROVIDER, &body)
    }

    /// First film carrying the given IMDb id.
    pub async fn get_film_by_imdb(&self, imdb_id: &str) -> ProviderResult<KpFilm> {
        let body = self
            .get("v2.2/films", &[("imdbId", imdb_id.to_string())])
            .await?;
        let found: KpFilmSearchByImdb = decode(PROVIDER, &body)?;
        found
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound("film not found".to_string()))
    }

    /// Keyword search. Answers in the v2.1 list shape.
    pub async fn search_films(&self, keyword: &str, page: u32) -> ProviderResult<KpFilmPage> {
        let body = self
            .get(
                "v2.1/films/search-by-keyword",
                &[
                    ("keyword", keyword.to_string()),
                    ("page", page.max(1).to_string()),
                ],
            )
            .await?;
        decode_page(&body)
    }

    /// A named collection such as `TOP_100_POPULAR_FILMS`.
    pub async fn collection(&self, top_type: &str, page: u32) -> ProviderResult<KpFilmPage> {
        let body = self
            .get(
                "v2.2/films/top",
                &[
                    ("type", top_type.to_string()),
                    ("page", page.max(1).to_string()),
                ],
            )
            .await?;
        decode_page(&body)
    }

    /// Films the upstream lists as similar to `id`.
    pub async fn similars(&self, id: i64) -> ProviderResult<KpFilmPage> {
        let body = self.get(&format!("v2.2/films/{id}/similars"), &[]).await?;
        let mut page = decode_page(&body)?;
        if page.total_pages == 0 && !page.films.is_empty() {
            page.total_pages = 1;
        }
        Ok(page)
    }

    pub async fn external_sources(&self, id: i64) -> ProviderResult<Vec<KpExternalSource>> {
        let body = self
            .get(&format!("v2.2/films/{id}/external_sources"), &[])
            .await?;
        let sources: KpExternalSources = decode(PROVIDER, &body)?;
        Ok(sources.items)
    }

    // ---- private helpers ----

    async fn get(&self, path: &str, params: &[(&str, String)]) -> ProviderResult<Vec<u8>> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .header("X-API-KEY", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        read_bytes(PROVIDER, response).await
    }
}

fn decode_page(body: &[u8]) -> ProviderResult<KpFilmPage> {
    parse_film_page(body).map_err(|e| ProviderError::Decode {
        provider: PROVIDER,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_upstream;
    use assert_matches::assert_matches;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};

    #[tokio::test]
    async fn film_request_carries_api_key() {
        let app = Router::new().route(
            "/v2.2/films/{id}",
            get(|headers: HeaderMap| async move {
                if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("kp-key") {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(Json(serde_json::json!({
                    "kinopoiskId": 326,
                    "imdbId": "tt0111161",
                    "nameRu": "Побег из Шоушенка",
                    "year": "1994"
                })))
            }),
        );
        let base = spawn_upstream(app).await;

        let film = KpClient::new(base.clone(), "kp-key".into())
            .unwrap()
            .get_film(326)
            .await
            .unwrap();
        assert_eq!(film.kinopoisk_id, 326);
        assert_eq!(film.year, 1994);

        let err = KpClient::new(base, "wrong".into())
            .unwrap()
            .get_film(326)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Kinopoisk API error: 401");
    }

    #[tokio::test]
    async fn imdb_lookup_with_no_items_is_not_found() {
        let app = Router::new().route(
            "/v2.2/films",
            get(|| async { Json(serde_json::json!({"total": 0, "items": []})) }),
        );
        let base = spawn_upstream(app).await;
        let client = KpClient::new(base, "k".into()).unwrap();

        assert_matches!(
            client.get_film_by_imdb("tt0000000").await,
            Err(ProviderError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn search_accepts_legacy_page_shape() {
        let app = Router::new().route(
            "/v2.1/films/search-by-keyword",
            get(|| async {
                Json(serde_json::json!({
                    "keyword": "матрица",
                    "pagesCount": 2,
                    "searchFilmsCountResult": 25,
                    "films": [{"filmId": 301, "nameRu": "Матрица", "rating": "8.5"}]
                }))
            }),
        );
        let base = spawn_upstream(app).await;
        let client = KpClient::new(base, "k".into()).unwrap();

        let page = client.search_films("матрица", 1).await.unwrap();
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total, 25);
        assert_eq!(page.films[0].native_id(), 301);
    }

    #[tokio::test]
    async fn similars_without_page_count_report_one_page() {
        let app = Router::new().route(
            "/v2.2/films/{id}/similars",
            get(|| async {
                Json(serde_json::json!({
                    "total": 1,
                    "items": [{"filmId": 435, "nameRu": "Зеленая миля"}]
                }))
            }),
        );
        let base = spawn_upstream(app).await;
        let client = KpClient::new(base, "k".into()).unwrap();

        let page = client.similars(326).await.unwrap();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.films[0].native_id(), 435);
    }
}

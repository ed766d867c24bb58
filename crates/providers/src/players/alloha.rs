//! Alloha: iframe lookup by Kinopoisk/IMDb id, plus the title metadata the
//! torrent search uses to build its indexer query.

use std::time::Duration;

use neomovies_core::flexible::{flexible_i32, flexible_string};
use serde::Deserialize;

use super::{append_episode, Episode, IdType, PlayerEmbed};
use crate::error::{build_client, parse_json, ProviderError, ProviderResult};

const PROVIDER: &str = "Alloha";

/// Voice-over track used when the request names none.
pub const DEFAULT_TRANSLATION: &str = "66";

#[derive(Debug, Default, Deserialize)]
struct AllohaResponse {
    #[serde(default, deserialize_with = "flexible_string")]
    status: String,
    #[serde(default)]
    data: Option<AllohaData>,
}

#[derive(Debug, Default, Deserialize)]
struct AllohaData {
    #[serde(default, deserialize_with = "flexible_string")]
    iframe: String,
    #[serde(default, deserialize_with = "flexible_string")]
    name: String,
    #[serde(default, deserialize_with = "flexible_string")]
    original_name: String,
    #[serde(default, deserialize_with = "flexible_i32")]
    year: i32,
}

/// Titles and year of a release as Alloha knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllohaMeta {
    pub title: String,
    pub original_title: String,
    /// Empty when unknown.
    pub year: String,
}

pub struct AllohaClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl AllohaClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.alloha.tv";
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: String, token: String) -> ProviderResult<Self> {
        Ok(Self::with_client(build_client(Self::TIMEOUT)?, base_url, token))
    }

    pub fn with_client(client: reqwest::Client, base_url: String, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Look up the player for an id.
    ///
    /// A plain URL answer gets `season`, `episode` and `translation`
    /// appended for series; iframe markup is passed through untouched.
    pub async fn embed(
        &self,
        id_type: IdType,
        id: &str,
        episode: Option<Episode>,
        translation: Option<&str>,
    ) -> ProviderResult<PlayerEmbed> {
        let data = self.lookup(id_type, id).await?;
        let iframe = data.iframe.trim();
        if iframe.is_empty() {
            return Err(ProviderError::NotFound("Video not found".to_string()));
        }

        if iframe.contains('<') {
            return Ok(PlayerEmbed::Markup(iframe.to_string()));
        }

        let translation = translation
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TRANSLATION);
        Ok(PlayerEmbed::Url(append_episode(
            iframe,
            episode,
            &[("translation", translation)],
        )))
    }

    /// Titles and year for an IMDb id.
    pub async fn lookup_meta(&self, imdb_id: &str) -> ProviderResult<AllohaMeta> {
        let data = self.lookup(IdType::Imdb, imdb_id).await?;
        Ok(AllohaMeta {
            title: data.name,
            original_title: data.original_name,
            year: if data.year > 0 {
                data.year.to_string()
            } else {
                String::new()
            },
        })
    }

    // ---- private helpers ----

    async fn lookup(&self, id_type: IdType, id: &str) -> ProviderResult<AllohaData> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[("token", self.token.as_str()), (id_type.as_str(), id)])
            .send()
            .await?;

        let body: AllohaResponse = parse_json(PROVIDER, response).await?;
        match body.data {
            Some(data) if body.status == "success" => Ok(data),
            _ => Err(ProviderError::NotFound("Video not found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_upstream;
    use assert_matches::assert_matches;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    async fn client() -> AllohaClient {
        let app = Router::new().route(
            "/",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.get("token").map(String::as_str) != Some("tok") {
                    return Json(serde_json::json!({"status": "error", "error_info": "bad token"}));
                }
                let body = match (q.get("imdb"), q.get("kp")) {
                    (Some(imdb), _) if imdb == "tt0111161" => serde_json::json!({
                        "status": "success",
                        "data": {
                            "iframe": "https://alloha.example/?token_movie=abc",
                            "name": "Побег из Шоушенка",
                            "original_name": "The Shawshank Redemption",
                            "year": "1994"
                        }
                    }),
                    (_, Some(kp)) if kp == "326" => serde_json::json!({
                        "status": "success",
                        "data": {"iframe": "<iframe src=\\\"https://alloha.example/x\\\"></iframe>"}
                    }),
                    _ => serde_json::json!({"status": "error", "data": null}),
                };
                Json(body)
            }),
        );
        AllohaClient::new(spawn_upstream(app).await, "tok".into()).unwrap()
    }

    #[tokio::test]
    async fn url_embed_gets_episode_and_default_translation() {
        let client = client().await;
        let embed = client
            .embed(
                IdType::Imdb,
                "tt0111161",
                Some(Episode { season: 1, episode: 2 }),
                None,
            )
            .await
            .unwrap();
        assert_eq!(
            embed,
            PlayerEmbed::Url(
                "https://alloha.example/?token_movie=abc&season=1&episode=2&translation=66".into()
            )
        );
    }

    #[tokio::test]
    async fn markup_embed_is_passed_through() {
        let client = client().await;
        let embed = client.embed(IdType::Kp, "326", None, None).await.unwrap();
        assert_matches!(embed, PlayerEmbed::Markup(m) if m.starts_with("<iframe"));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let client = client().await;
        assert_matches!(
            client.embed(IdType::Imdb, "tt0000000", None, None).await,
            Err(ProviderError::NotFound(msg)) if msg == "Video not found"
        );
    }

    #[tokio::test]
    async fn meta_lookup_reads_titles_and_year() {
        let meta = client().await.lookup_meta("tt0111161").await.unwrap();
        assert_eq!(meta.title, "Побег из Шоушенка");
        assert_eq!(meta.original_title, "The Shawshank Redemption");
        assert_eq!(meta.year, "1994");
    }
}

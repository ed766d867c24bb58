//! HDVB video database.
//!
//! `GET /api/videos.json?token=..&id_kp=..` (or `imdb_id=..`) answers with
//! an array of releases; the first one with an iframe URL wins.

use std::time::Duration;

use neomovies_core::flexible::flexible_string;
use serde::Deserialize;

use super::{append_episode, Episode, IdType, PlayerEmbed};
use crate::error::{build_client, parse_json, ProviderError, ProviderResult};

const PROVIDER: &str = "HDVB";

#[derive(Debug, Deserialize)]
struct HdvbVideo {
    #[serde(default, deserialize_with = "flexible_string")]
    iframe_url: String,
}

pub struct HdvbClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HdvbClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://apivb.com";
    pub const TIMEOUT: Duration = Duration::from_secs(8);

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

    pub async fn embed(
        &self,
        id_type: IdType,
        id: &str,
        episode: Option<Episode>,
    ) -> ProviderResult<PlayerEmbed> {
        let key = match id_type {
            IdType::Kp => "id_kp",
            IdType::Imdb => "imdb_id",
        };
        let response = self
            .client
            .get(format!("{}/api/videos.json", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("token", self.token.as_str()), (key, id)])
            .send()
            .await?;

        let videos: Vec<HdvbVideo> = parse_json(PROVIDER, response).await?;
        let url = videos
            .into_iter()
            .map(|v| v.iframe_url)
            .find(|u| !u.is_empty())
            .ok_or_else(|| ProviderError::NotFound("Video not found".to_string()))?;

        Ok(PlayerEmbed::Url(append_episode(&url, episode, &[])))
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

    async fn client() -> HdvbClient {
        let app = Router::new().route(
            "/api/videos.json",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                Json(match q.get("id_kp").map(String::as_str) {
                    Some("326") => serde_json::json!([
                        {"iframe_url": ""},
                        {"iframe_url": "https://hdvb.example/movie/abc/iframe"}
                    ]),
                    _ => serde_json::json!([]),
                })
            }),
        );
        HdvbClient::new(spawn_upstream(app).await, "t".into()).unwrap()
    }

    #[tokio::test]
    async fn picks_first_release_with_iframe() {
        assert_eq!(
            client().await.embed(IdType::Kp, "326", None).await.unwrap(),
            PlayerEmbed::Url("https://hdvb.example/movie/abc/iframe".into())
        );
    }

    #[tokio::test]
    async fn empty_list_is_not_found() {
        assert_matches!(
            client().await.embed(IdType::Imdb, "tt1", None).await,
            Err(ProviderError::NotFound(_))
        );
    }
}

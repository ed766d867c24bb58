//! External reaction counter (cub.rip).
//!
//! Titles are keyed as `{mediaType}_{mediaId}`, e.g. `movie_278`.

use std::time::Duration;

use neomovies_core::flexible::{flexible_i64, flexible_string};
use neomovies_core::types::ReactionType;
use serde::{Deserialize, Serialize};

use crate::error::{build_client, ensure_success, parse_json, ProviderResult};

const PROVIDER: &str = "Cub";

/// Counter key for a title: `{media_type}_{media_id}`.
pub fn media_key(media_type: &str, media_id: &str) -> String {
    format!("{media_type}_{media_id}")
}

/// Public per-title reaction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub fire: i64,
    pub nice: i64,
    pub think: i64,
    pub bore: i64,
    pub shit: i64,
}

impl ReactionCounts {
    fn slot(&mut self, reaction: ReactionType) -> &mut i64 {
        match reaction {
            ReactionType::Fire => &mut self.fire,
            ReactionType::Nice => &mut self.nice,
            ReactionType::Think => &mut self.think,
            ReactionType::Bore => &mut self.bore,
            ReactionType::Shit => &mut self.shit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountsResponse {
    #[serde(default)]
    result: Vec<CounterRow>,
}

#[derive(Debug, Deserialize)]
struct CounterRow {
    #[serde(default, rename = "type", deserialize_with = "flexible_string")]
    kind: String,
    #[serde(default, deserialize_with = "flexible_i64")]
    counter: i64,
}

pub struct CubClient {
    client: reqwest::Client,
    base_url: String,
}

impl CubClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://cub.rip/api";
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: String) -> ProviderResult<Self> {
        Ok(Self::with_client(build_client(Self::TIMEOUT)?, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Raw counters for a title. Unknown reaction tags are ignored.
    pub async fn counts(&self, key: &str) -> ProviderResult<ReactionCounts> {
        let response = self
            .client
            .get(format!("{}/reactions/get/{key}", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let body: CountsResponse = parse_json(PROVIDER, response).await?;
        let mut counts = ReactionCounts::default();
        for row in body.result {
            if let Ok(reaction) = row.kind.parse::<ReactionType>() {
                *counts.slot(reaction) = row.counter;
            }
        }
        Ok(counts)
    }

    /// Register one reaction on the counter.
    pub async fn set(&self, key: &str, reaction: ReactionType) -> ProviderResult<()> {
        let response = self
            .client
            .get(format!("{}/reactions/set", self.base_url))
            .query(&[("mediaId", key), ("type", reaction.as_str())])
            .send()
            .await?;
        ensure_success(PROVIDER, response).await?;
        Ok(())
    }

    /// Withdraw one reaction from the counter.
    pub async fn remove(&self, key: &str, reaction: ReactionType) -> ProviderResult<()> {
        let response = self
            .client
            .post(format!("{}/reactions/remove/{key}/{reaction}", self.base_url))
            .send()
            .await?;
        ensure_success(PROVIDER, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_upstream;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::collections::HashMap;

    #[test]
    fn key_joins_type_and_id() {
        assert_eq!(media_key("movie", "278"), "movie_278");
    }

    #[tokio::test]
    async fn counts_map_known_tags() {
        let app = Router::new().route(
            "/reactions/get/{key}",
            get(|Path(key): Path<String>| async move {
                assert_eq!(key, "movie_278");
                Json(serde_json::json!({"secuses": true, "result": [
                    {"type": "fire", "counter": 12},
                    {"type": "shit", "counter": "3"},
                    {"type": "love", "counter": 99}
                ]}))
            }),
        );
        let client = CubClient::new(spawn_upstream(app).await).unwrap();

        let counts = client.counts("movie_278").await.unwrap();
        assert_eq!(
            counts,
            ReactionCounts {
                fire: 12,
                shit: 3,
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn set_and_remove_hit_expected_endpoints() {
        let app = Router::new()
            .route(
                "/reactions/set",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    if q.get("mediaId").map(String::as_str) == Some("tv_1399")
                        && q.get("type").map(String::as_str) == Some("nice")
                    {
                        StatusCode::OK
                    } else {
                        StatusCode::BAD_REQUEST
                    }
                }),
            )
            .route(
                "/reactions/remove/{key}/{kind}",
                post(|Path((key, kind)): Path<(String, String)>| async move {
                    if key == "tv_1399" && kind == "nice" {
                        StatusCode::OK
                    } else {
                        StatusCode::NOT_FOUND
                    }
                }),
            );
        let client = CubClient::new(spawn_upstream(app).await).unwrap();

        client.set("tv_1399", ReactionType::Nice).await.unwrap();
        client.remove("tv_1399", ReactionType::Nice).await.unwrap();
        assert!(client.remove("tv_1399", ReactionType::Fire).await.is_err());
    }
}

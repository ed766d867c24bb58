//! RgShows: direct stream URLs keyed by TMDB id.

use std::time::Duration;

use neomovies_core::flexible::flexible_string;
use serde::Deserialize;

use super::Episode;
use crate::error::{build_client, parse_json, ProviderError, ProviderResult};

const PROVIDER: &str = "RgShows";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct RgShowsResponse {
    #[serde(default)]
    stream: Option<RgShowsStream>,
}

#[derive(Debug, Deserialize)]
struct RgShowsStream {
    #[serde(default, deserialize_with = "flexible_string")]
    url: String,
}

pub struct RgShowsClient {
    client: reqwest::Client,
    base_url: String,
}

impl RgShowsClient {
    pub const NAME: &'static str = PROVIDER;
    pub const DEFAULT_BASE_URL: &'static str = "https://rgshows.com";
    /// The upstream resolves streams on demand and is slow.
    pub const TIMEOUT: Duration = Duration::from_secs(40);

    pub fn new(base_url: String) -> ProviderResult<Self> {
        Ok(Self::with_client(build_client(Self::TIMEOUT)?, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Stream URL for a movie, or for an episode when `episode` is set.
    pub async fn stream(&self, tmdb_id: &str, episode: Option<Episode>) -> ProviderResult<String> {
        let url = match episode {
            Some(ep) => format!(
                "{}/main/tv/{tmdb_id}/{}/{}",
                self.base_url, ep.season, ep.episode
            ),
            None => format!("{}/main/movie/{tmdb_id}", self.base_url),
        };

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let body: RgShowsResponse = parse_json(PROVIDER, response).await?;
        body.stream
            .map(|s| s.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ProviderError::NotFound("stream not found".to_string()))
    }
}

//! Vibix publisher API.

use std::time::Duration;

use neomovies_core::flexible::flexible_string;
use serde::Deserialize;

use super::{append_episode, Episode, IdType, PlayerEmbed};
use crate::error::{build_client, parse_json, ProviderError, ProviderResult};

const PROVIDER: &str = "Vibix";

#[derive(Debug, Deserialize)]
struct VibixVideo {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "flexible_string")]
    iframe_url: String,
}

pub struct VibixClient {
    client: reqwest::Client,
    host: String,
    token: String,
}

impl VibixClient {
    pub const DEFAULT_HOST: &'static str = "https://vibix.org";
    pub const TIMEOUT: Duration = Duration::from_secs(8);

    pub fn new(host: String, token: String) -> ProviderResult<Self> {
        Ok(Self::with_client(build_client(Self::TIMEOUT)?, host, token))
    }

    pub fn with_client(client: reqwest::Client, host: String, token: String) -> Self {
        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// `GET /api/v1/publisher/videos/{kp|imdb}/{id}`.
    pub async fn embed(
        &self,
        id_type: IdType,
        id: &str,
        episode: Option<Episode>,
    ) -> ProviderResult<PlayerEmbed> {
        let response = self
            .client
            .get(format!(
                "{}/api/v1/publisher/videos/{}/{}",
                self.host,
                id_type,
                urlencoding::encode(id)
            ))
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("X-CSRF-TOKEN", "")
            .send()
            .await?;

        let video: VibixVideo = parse_json(PROVIDER, response).await?;
        let has_id = video.id.as_ref().is_some_and(|id| !id.is_null());
        if !has_id || video.iframe_url.is_empty() {
            return Err(ProviderError::NotFound("Video not found".to_string()));
        }

        Ok(PlayerEmbed::Url(append_episode(&video.iframe_url, episode, &[])))
    }
}

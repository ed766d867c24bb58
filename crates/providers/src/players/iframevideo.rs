//! IframeVideo: a three-step flow to a direct stream URL.
//!
//! 1. `GET {api}/api/v2/search?imdb=..&kp=..` finds the content id and the
//!    iframe page path.
//! 2. The iframe page is fetched with browser-like headers and a token is
//!    scraped from it (see [`extract_token`]).
//! 3. A multipart `POST {cdn}/loadvideo` with the token returns `src`.

use std::sync::LazyLock;
use std::time::Duration;

use neomovies_core::flexible::{flexible_i64, flexible_string};
use regex::Regex;
use serde::Deserialize;

use crate::error::{build_client, ensure_success, parse_json, ProviderError, ProviderResult};

const PROVIDER: &str = "IframeVideo";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36";

/// Token sits in the path segment right before `/iframe`, as in
/// `https://videoframe.space/movie/<token>/iframe`.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[^/]+/([^/]+)/iframe").expect("valid regex"));

/// Pull the player token out of the iframe page HTML.
///
/// This is the only place that knows the page layout; a template change
/// upstream should only ever need an edit here.
pub fn extract_token(html: &str) -> Option<&str> {
    TOKEN_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default, deserialize_with = "flexible_i64")]
    cid: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    path: String,
    #[serde(default, rename = "type", deserialize_with = "flexible_string")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct VideoResponse {
    #[serde(default, deserialize_with = "flexible_string")]
    src: String,
}

pub struct IframeVideoClient {
    client: reqwest::Client,
    api_host: String,
    cdn_host: String,
}

impl IframeVideoClient {
    pub const NAME: &'static str = PROVIDER;
    pub const DEFAULT_API_HOST: &'static str = "https://iframe.video";
    pub const DEFAULT_CDN_HOST: &'static str = "https://videoframe.space";
    pub const TIMEOUT: Duration = Duration::from_secs(8);

    pub fn new(api_host: String, cdn_host: String) -> ProviderResult<Self> {
        Ok(Self::with_client(
            build_client(Self::TIMEOUT)?,
            api_host,
            cdn_host,
        ))
    }

    pub fn with_client(client: reqwest::Client, api_host: String, cdn_host: String) -> Self {
        Self {
            client,
            api_host: api_host.trim_end_matches('/').to_string(),
            cdn_host: cdn_host.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a direct stream URL from either external id.
    pub async fn stream(&self, kinopoisk_id: &str, imdb_id: &str) -> ProviderResult<String> {
        let hit = self.search(kinopoisk_id, imdb_id).await?;
        let token = self.fetch_token(&hit.path).await?;
        self.load_video(hit.cid, &token, &hit.kind).await
    }

    // ---- private helpers ----

    async fn search(&self, kinopoisk_id: &str, imdb_id: &str) -> ProviderResult<SearchHit> {
        let response = self
            .client
            .get(format!("{}/api/v2/search", self.api_host))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("imdb", imdb_id), ("kp", kinopoisk_id)])
            .send()
            .await?;

        let found: SearchResponse = parse_json(PROVIDER, response).await?;
        found
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound("content not found".to_string()))
    }

    async fn fetch_token(&self, path: &str) -> ProviderResult<String> {
        let response = self
            .client
            .get(path)
            .header("DNT", "1")
            .header(reqwest::header::REFERER, format!("{}/", self.cdn_host))
            .header("Sec-Fetch-Dest", "iframe")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "cross-site")
            .header("Upgrade-Insecure-Requests", "1")
            .header(
                "sec-ch-ua",
                r#""Google Chrome";v="113", "Chromium";v="113", "Not-A.Brand";v="24""#,
            )
            .header("sec-ch-ua-mobile", "?0")
            .header("sec-ch-ua-platform", r#""Windows""#)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let html = ensure_success(PROVIDER, response).await?.text().await?;
        extract_token(&html)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::NotFound("token not found in iframe content".to_string()))
    }

    async fn load_video(&self, cid: i64, token: &str, kind: &str) -> ProviderResult<String> {
        let form = reqwest::multipart::Form::new()
            .text("token", token.to_string())
            .text("type", kind.to_string())
            .text("season", "")
            .text("episode", "")
            .text("mobile", "false")
            .text("id", cid.to_string())
            .text("qt", "480");

        let response = self
            .client
            .post(format!("{}/loadvideo", self.cdn_host))
            .header(reqwest::header::ORIGIN, self.cdn_host.as_str())
            .header(reqwest::header::REFERER, format!("{}/", self.cdn_host))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .multipart(form)
            .send()
            .await?;

        let video: VideoResponse = parse_json(PROVIDER, response).await?;
        if video.src.is_empty() {
            return Err(ProviderError::NotFound("video URL not found".to_string()));
        }
        Ok(video.src)
    }
}

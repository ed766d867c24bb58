//! Upstream fetcher for the image proxy.
//!
//! Hotlink-protected hosts reject requests without a matching `Referer`,
//! while some CDNs reject any foreign `Referer`. The fetcher therefore
//! tries twice: once with the host-aware referer, once without.

use std::time::Duration;

use neomovies_core::images::referer_for;

use crate::error::{build_client, ensure_success, ProviderError, ProviderResult};

const PROVIDER: &str = "Image";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_IMAGE: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";

/// A successful upstream response whose body has not been read yet.
///
/// The proxy streams `response` straight to the client.
#[derive(Debug)]
pub struct FetchedImage {
    pub content_type: String,
    pub content_length: Option<u64>,
    pub response: reqwest::Response,
}

pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    pub const TIMEOUT: Duration = Duration::from_secs(12);
    pub const ATTEMPTS: usize = 2;

    pub fn new() -> ProviderResult<Self> {
        Ok(Self::with_client(build_client(Self::TIMEOUT)?))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch `url`, forwarding the caller's user agent when it has one.
    ///
    /// Returns the last attempt's error when both attempts fail.
    pub async fn fetch(&self, url: &str, user_agent: Option<&str>) -> ProviderResult<FetchedImage> {
        let user_agent = user_agent
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(DEFAULT_USER_AGENT);
        let referer = referer_for(url);

        let mut last_err = ProviderError::NotFound("image not fetched".to_string());
        for attempt in 0..Self::ATTEMPTS {
            let referer = if attempt == 0 { referer.as_deref() } else { None };
            match self.attempt(url, user_agent, referer).await {
                Ok(image) => return Ok(image),
                Err(e) => {
                    tracing::debug!(url, attempt, error = %e, "Image fetch attempt failed");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    // ---- private helpers ----

    async fn attempt(
        &self,
        url: &str,
        user_agent: &str,
        referer: Option<&str>,
    ) -> ProviderResult<FetchedImage> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_IMAGE)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(reqwest::header::USER_AGENT, user_agent);
        if let Some(referer) = referer {
            request = request.header(reqwest::header::REFERER, referer);
        }

        let response = ensure_success(PROVIDER, request.send().await?).await?;
        let content_length = response.content_length();
        if content_length == Some(0) {
            return Err(ProviderError::NotFound("empty image body".to_string()));
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        Ok(FetchedImage {
            content_type,
            content_length,
            response,
        })
    }
}

//! Torrent indexer client (RedAPI, a Jackett-compatible aggregator).

use std::time::Duration;

use neomovies_core::torrent::{parse_results, IndexerQuery, RedApiResponse, TorrentResult};

use crate::error::{build_client, parse_json, ProviderResult};

const PROVIDER: &str = "RedAPI";

pub struct RedApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RedApiClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://redapi.cfhttp.top";
    pub const TIMEOUT: Duration = Duration::from_secs(8);

    pub fn new(base_url: String, api_key: Option<String>) -> ProviderResult<Self> {
        Ok(Self::with_client(
            build_client(Self::TIMEOUT)?,
            base_url,
            api_key,
        ))
    }

    pub fn with_client(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Run one indexer search and parse the rows.
    pub async fn search(&self, query: &IndexerQuery) -> ProviderResult<Vec<TorrentResult>> {
        let mut request = self
            .client
            .get(format!("{}/api/v2.0/indexers/all/results", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query.pairs());
        if let Some(key) = &self.api_key {
            request = request.query(&[("apikey", key)]);
        }

        let response = request.send().await?;
        let raw: RedApiResponse = parse_json(PROVIDER, response).await?;
        let rows = parse_results(raw);
        tracing::debug!(rows = rows.len(), "Indexer search complete");
        Ok(rows)
    }
}

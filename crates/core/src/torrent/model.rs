//! Indexer payloads and the normalized torrent row.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::flexible::{flexible_i64, flexible_string, value_to_i64};

use super::quality::extract_quality;

/// Source tag stamped on every parsed row.
pub const INDEXER_SOURCE: &str = "RedAPI";

/// `GET /api/v2.0/indexers/all/results`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedApiResponse {
    #[serde(default, rename = "Results")]
    pub results: Vec<RedApiTorrent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RedApiTorrent {
    #[serde(default, deserialize_with = "flexible_string")]
    pub title: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub tracker: String,
    /// String (`"1.46 GB"`) or number of bytes.
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub seeders: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub peers: i64,
    #[serde(default, deserialize_with = "flexible_string")]
    pub magnet_uri: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub publish_date: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub category_desc: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub details: String,
    #[serde(default)]
    pub info: Option<RedApiInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedApiInfo {
    /// String (`"1080p"`) or bare number (`1080`).
    #[serde(default)]
    pub quality: Option<Value>,
    #[serde(default)]
    pub voices: Option<Vec<String>>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    #[serde(default)]
    pub seasons: Option<Vec<Value>>,
}

/// A normalized torrent row as served to clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TorrentResult {
    pub title: String,
    pub tracker: String,
    pub size: String,
    pub seeders: i64,
    pub peers: i64,
    pub leechers: i64,
    pub quality: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voice: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<i32>,
    pub category: String,
    pub magnet: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub torrent_link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
    pub publish_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub added_date: String,
    pub source: String,
}

/// Normalize raw indexer rows.
pub fn parse_results(response: RedApiResponse) -> Vec<TorrentResult> {
    response.results.into_iter().map(parse_row).collect()
}

fn parse_row(raw: RedApiTorrent) -> TorrentResult {
    let info = raw.info.unwrap_or_default();

    let mut quality = info.quality.as_ref().map(quality_text).unwrap_or_default();
    if quality.is_empty() {
        quality = extract_quality(&raw.title).to_string();
    }

    let seasons = info
        .seasons
        .unwrap_or_default()
        .iter()
        .filter_map(|v| i32::try_from(value_to_i64(v)).ok())
        .filter(|s| *s > 0)
        .collect();

    TorrentResult {
        size: raw.size.as_ref().map(size_text).unwrap_or_default(),
        leechers: (raw.peers - raw.seeders).max(0),
        seeders: raw.seeders,
        peers: raw.peers,
        quality,
        voice: info.voices.unwrap_or_default(),
        types: info.types.unwrap_or_default(),
        seasons,
        category: raw.category_desc,
        magnet: raw.magnet_uri,
        torrent_link: String::new(),
        details: raw.details,
        publish_date: raw.publish_date,
        added_date: String::new(),
        source: INDEXER_SOURCE.to_string(),
        title: raw.title,
        tracker: raw.tracker,
    }
}

fn size_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format!("{:.0}", n.as_f64().unwrap_or(0.0)),
        _ => String::new(),
    }
}

fn quality_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format!("{:.0}p", n.as_f64().unwrap_or(0.0)),
        _ => String::new(),
    }
}

//! Shared response envelope types for API handlers.
//!
//! Two envelopes coexist:
//!
//! - [`ApiResponse`]: the legacy `{ success, data?, message? }` shape used by
//!   auth, favorites, reactions, players and torrents.
//! - [`UnifiedResponse`] / [`UnifiedSearchResponse`]: the catalog shape with
//!   `source` and request [`Metadata`].

use std::time::Instant;

use chrono::Utc;
use neomovies_core::model::{UnifiedPage, UnifiedSearchItem};
use neomovies_core::source::Source;
use neomovies_core::types::Timestamp;
use serde::Serialize;

/// Version tag reported in [`Metadata::api_version`].
pub const API_VERSION: &str = "3.0";

/// Legacy `{ "success": true, "data": T, "message": ... }` envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(favorites).with_message("Favorites retrieved successfully")))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Request metadata attached to unified responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub fetched_at: Timestamp,
    pub api_version: &'static str,
    /// Handler latency in milliseconds.
    pub response_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Metadata {
    pub fn since(started: Instant, query: Option<String>) -> Self {
        Self {
            fetched_at: Utc::now(),
            api_version: API_VERSION,
            response_time: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            query,
        }
    }
}

/// `{ success, data, source, metadata }`.
#[derive(Debug, Serialize)]
pub struct UnifiedResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub source: Source,
    pub metadata: Metadata,
}

impl<T: Serialize> UnifiedResponse<T> {
    pub fn new(data: T, source: Source, started: Instant) -> Self {
        Self {
            success: true,
            data,
            source,
            metadata: Metadata::since(started, None),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub total_pages: i64,
    pub total_results: i64,
    /// Number of items on this page.
    pub page_size: usize,
}

/// Unified envelope plus `pagination`.
#[derive(Debug, Serialize)]
pub struct UnifiedSearchResponse {
    pub success: bool,
    pub data: Vec<UnifiedSearchItem>,
    pub source: Source,
    pub pagination: Pagination,
    pub metadata: Metadata,
}

impl UnifiedSearchResponse {
    pub fn from_page(
        page: UnifiedPage,
        source: Source,
        started: Instant,
        query: Option<String>,
    ) -> Self {
        let pagination = Pagination {
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
            page_size: page.items.len(),
        };
        Self {
            success: true,
            data: page.items,
            source,
            pagination,
            metadata: Metadata::since(started, query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_omits_empty_fields() {
        let json = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "message": "done" }));

        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn search_response_counts_page_size() {
        let page = UnifiedPage {
            items: Vec::new(),
            page: 3,
            total_pages: 10,
            total_results: 200,
        };
        let json = serde_json::to_value(UnifiedSearchResponse::from_page(
            page,
            Source::Tmdb,
            Instant::now(),
            Some("matrix".into()),
        ))
        .unwrap();

        assert_eq!(json["source"], "tmdb");
        assert_eq!(json["pagination"]["page"], 3);
        assert_eq!(json["pagination"]["totalPages"], 10);
        assert_eq!(json["pagination"]["pageSize"], 0);
        assert_eq!(json["metadata"]["apiVersion"], "3.0");
        assert_eq!(json["metadata"]["query"], "matrix");
    }
}

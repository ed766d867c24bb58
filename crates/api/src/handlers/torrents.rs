//! Handlers for the `/torrents` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use neomovies_core::torrent::{
    filter_by_content_type, group_results, process, ContentType, IndexerQuery, SortBy, SortOrder,
    TorrentGroups, TorrentKind, TorrentResult, TorrentSearchOptions,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::{non_blank, parse_bool, parse_positive, split_csv};
use crate::response::ApiResponse;
use crate::services::torrents::{self, TitleMeta};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string shared by the torrent endpoints. Values stay raw strings
/// so malformed numbers and flags fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentParams {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub quality: Option<String>,
    pub min_quality: Option<String>,
    pub max_quality: Option<String>,
    pub exclude_qualities: Option<String>,
    pub hdr: Option<String>,
    pub hevc: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub group_by_quality: Option<String>,
    pub group_by_season: Option<String>,
    pub season: Option<String>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub year: Option<String>,
    pub query: Option<String>,
}

impl TorrentParams {
    fn media_type(&self) -> &str {
        non_blank(self.media_type.as_deref()).unwrap_or("movie")
    }

    fn season(&self) -> Option<i32> {
        parse_positive(self.season.as_deref())
    }

    fn title_meta(&self) -> AppResult<TitleMeta> {
        let meta = TitleMeta {
            title: non_blank(self.title.as_deref()).unwrap_or_default().to_string(),
            original_title: non_blank(self.original_title.as_deref())
                .unwrap_or_default()
                .to_string(),
            year: non_blank(self.year.as_deref()).unwrap_or_default().to_string(),
        };
        if meta.title.is_empty() && meta.original_title.is_empty() {
            return Err(AppError::BadRequest(
                "Title or original title is required".into(),
            ));
        }
        Ok(meta)
    }

    /// Filter, sort and grouping options. Grouping needs a literal `true`.
    pub fn search_options(&self) -> TorrentSearchOptions {
        TorrentSearchOptions {
            season: self.season(),
            quality: split_csv(self.quality.as_deref()),
            min_quality: non_blank(self.min_quality.as_deref()).map(str::to_string),
            max_quality: non_blank(self.max_quality.as_deref()).map(str::to_string),
            exclude_qualities: split_csv(self.exclude_qualities.as_deref()),
            hdr: parse_bool(self.hdr.as_deref()),
            hevc: parse_bool(self.hevc.as_deref()),
            sort_by: self
                .sort_by
                .as_deref()
                .and_then(|s| s.parse::<SortBy>().ok())
                .unwrap_or_default(),
            sort_order: self
                .sort_order
                .as_deref()
                .and_then(|s| s.parse::<SortOrder>().ok())
                .unwrap_or_default(),
            group_by_quality: self.group_by_quality.as_deref() == Some("true"),
            group_by_season: self.group_by_season.as_deref() == Some("true"),
            content_type: self.media_type().parse::<ContentType>().ok(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImdbSearchResponse {
    pub imdb_id: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<i32>,
    pub grouped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<TorrentGroups>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<TorrentResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSearchResponse {
    pub title: String,
    pub original_title: String,
    pub year: String,
    #[serde(rename = "type")]
    pub media_type: &'static str,
    pub total: usize,
    pub results: Vec<TorrentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonsResponse {
    pub title: String,
    pub original_title: String,
    pub year: String,
    pub seasons: Vec<i32>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct QuerySearchResponse {
    pub query: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub year: String,
    pub total: usize,
    pub results: Vec<TorrentResult>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/torrents/search/{imdbId}
///
/// Titles are resolved from the IMDb id, then the indexer rows go through
/// the filter, sort and optional grouping stages. An empty result is a
/// 404 carrying the same shape plus `error`.
pub async fn search_by_imdb(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
    Query(params): Query<TorrentParams>,
) -> AppResult<Response> {
    let imdb_id = imdb_id.trim().to_string();
    if imdb_id.is_empty() {
        return Err(AppError::BadRequest("IMDB ID is required".into()));
    }

    let media_type = params.media_type().to_string();
    let kind = media_type.parse::<TorrentKind>().unwrap_or_default();
    let options = params.search_options();

    // 1. Resolve titles for the indexer query.
    let meta = torrents::resolve_imdb_meta(&state, &imdb_id, kind).await?;

    // 2. Fetch, with the sparse-season retry for series.
    let query = torrents::title_query(&meta, kind)
        .param("imdb", imdb_id.as_str())
        .season(options.season);
    let rows = match kind {
        TorrentKind::Series => {
            torrents::search_with_season_fallback(&state, query, options.season).await?
        }
        TorrentKind::Movie | TorrentKind::Anime => state.redapi.search(&query).await?,
    };

    // 3. Filter and sort, then group if asked.
    let rows = process(rows, &options);
    let total = rows.len();
    let wants_groups = options.group_by_quality || options.group_by_season;
    let (groups, results) = if total > 0 && wants_groups {
        let groups = group_results(rows, options.group_by_quality, options.group_by_season);
        (groups, None)
    } else {
        (None, Some(rows))
    };

    let mut body = ImdbSearchResponse {
        imdb_id,
        media_type,
        total,
        season: options.season,
        grouped: groups.is_some(),
        groups,
        results,
        error: None,
    };

    if total == 0 {
        body.error = Some("No torrents found for this IMDB ID".into());
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    }

    tracing::debug!(imdb_id = %body.imdb_id, total, "Torrent search completed");
    Ok(Json(ApiResponse::ok(body)).into_response())
}

pub async fn movies(
    state: State<AppState>,
    params: Query<TorrentParams>,
) -> AppResult<Json<ApiResponse<TitleSearchResponse>>> {
    by_title(state, params, TorrentKind::Movie).await
}

/// GET /api/v1/torrents/series
///
/// `season` narrows the search and triggers the sparse-season retry.
pub async fn series(
    state: State<AppState>,
    params: Query<TorrentParams>,
) -> AppResult<Json<ApiResponse<TitleSearchResponse>>> {
    by_title(state, params, TorrentKind::Series).await
}

pub async fn anime(
    state: State<AppState>,
    params: Query<TorrentParams>,
) -> AppResult<Json<ApiResponse<TitleSearchResponse>>> {
    by_title(state, params, TorrentKind::Anime).await
}

/// GET /api/v1/torrents/seasons
pub async fn seasons(
    State(state): State<AppState>,
    Query(params): Query<TorrentParams>,
) -> AppResult<Json<ApiResponse<SeasonsResponse>>> {
    let meta = params.title_meta()?;
    let seasons = torrents::seasons(&state, &meta).await?;

    Ok(Json(ApiResponse::ok(SeasonsResponse {
        total: seasons.len(),
        title: meta.title,
        original_title: meta.original_title,
        year: meta.year,
        seasons,
    })))
}

/// GET /api/v1/torrents/search
///
/// Free-text indexer search restricted to the requested kind.
pub async fn search_by_query(
    State(state): State<AppState>,
    Query(params): Query<TorrentParams>,
) -> AppResult<Json<ApiResponse<QuerySearchResponse>>> {
    let query = non_blank(params.query.as_deref())
        .ok_or_else(|| AppError::BadRequest("Query is required".into()))?
        .to_string();
    let media_type = params.media_type().to_string();
    let year = non_blank(params.year.as_deref()).unwrap_or_default().to_string();

    let mut indexer_query = IndexerQuery::new()
        .param("query", query.as_str())
        .param("year", year.as_str());
    if let Ok(kind) = media_type.parse::<TorrentKind>() {
        indexer_query = indexer_query.kind(kind);
    }

    let rows = state.redapi.search(&indexer_query).await?;
    let results = match media_type.parse::<ContentType>() {
        Ok(content_type) => filter_by_content_type(rows, content_type),
        Err(()) => rows,
    };

    Ok(Json(ApiResponse::ok(QuerySearchResponse {
        query,
        media_type,
        year,
        total: results.len(),
        results,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn by_title(
    State(state): State<AppState>,
    Query(params): Query<TorrentParams>,
    kind: TorrentKind,
) -> AppResult<Json<ApiResponse<TitleSearchResponse>>> {
    let meta = params.title_meta()?;
    let season = match kind {
        TorrentKind::Series => params.season(),
        TorrentKind::Movie | TorrentKind::Anime => None,
    };

    let results = torrents::search_titles(&state, &meta, kind, season).await?;

    Ok(Json(ApiResponse::ok(TitleSearchResponse {
        total: results.len(),
        title: meta.title,
        original_title: meta.original_title,
        year: meta.year,
        media_type: kind.label(),
        results,
        season,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_seeders_desc_without_grouping() {
        let options = TorrentParams::default().search_options();
        assert_eq!(options.sort_by, SortBy::Seeders);
        assert_eq!(options.sort_order, SortOrder::Desc);
        assert!(!options.group_by_quality && !options.group_by_season);
        assert_eq!(options.content_type, Some(ContentType::Movie));
    }

    #[test]
    fn options_parse_lists_flags_and_season() {
        let params = TorrentParams {
            media_type: Some("tv".into()),
            quality: Some("1080p, 4K".into()),
            exclude_qualities: Some("360p".into()),
            hdr: Some("true".into()),
            sort_by: Some("size".into()),
            sort_order: Some("asc".into()),
            group_by_season: Some("true".into()),
            group_by_quality: Some("1".into()),
            season: Some("2".into()),
            ..Default::default()
        };
        let options = params.search_options();
        assert_eq!(options.quality, vec!["1080p", "4K"]);
        assert_eq!(options.exclude_qualities, vec!["360p"]);
        assert_eq!(options.hdr, Some(true));
        assert_eq!(options.hevc, None);
        assert_eq!(options.sort_by, SortBy::Size);
        assert_eq!(options.sort_order, SortOrder::Asc);
        assert!(options.group_by_season);
        assert!(!options.group_by_quality);
        assert_eq!(options.season, Some(2));
        assert_eq!(options.content_type, Some(ContentType::Serial));
    }

    #[test]
    fn title_meta_requires_some_title() {
        let err = TorrentParams::default().title_meta().unwrap_err();
        assert!(
            matches!(err, AppError::BadRequest(ref m) if m == "Title or original title is required")
        );

        let meta = TorrentParams {
            original_title: Some(" The Matrix ".into()),
            ..Default::default()
        }
        .title_meta()
        .unwrap();
        assert_eq!(meta.original_title, "The Matrix");
        assert!(meta.title.is_empty());
    }
}

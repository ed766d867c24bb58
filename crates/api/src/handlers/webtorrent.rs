//! In-browser torrent playback helpers.
//!
//! `/webtorrent/player` serves a self-contained page that streams the
//! largest video file of a magnet with the WebTorrent browser client;
//! `/webtorrent/metadata` describes the title the page is playing.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{self, StreamExt};
use neomovies_core::images::{build_image_proxy_url, BACKDROP_SIZE, POSTER_SIZE};
use neomovies_core::mapping::year_of;
use neomovies_core::tmdb::TmdbSeasonSummary;
use neomovies_providers::tmdb::TmdbClient;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::{non_blank, CatalogParams};
use crate::response::ApiResponse;
use crate::state::AppState;

const MAGNET_HEADER: &str = "x-magnet-link";
const SEASON_CONCURRENCY: usize = 4;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PlayerParams {
    pub magnet: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub poster_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backdrop_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub overview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Vec<SeasonMetadata>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonMetadata {
    pub season_number: i32,
    pub name: String,
    pub episode_count: i32,
    pub episodes: Vec<EpisodeMetadata>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeMetadata {
    pub episode_number: i32,
    pub name: String,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/webtorrent/player
///
/// The magnet comes from `?magnet=` or the `X-Magnet-Link` header.
pub async fn player(
    headers: HeaderMap,
    Query(params): Query<PlayerParams>,
) -> AppResult<Response> {
    let magnet = non_blank(params.magnet.as_deref())
        .or_else(|| {
            headers
                .get(MAGNET_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .ok_or_else(|| AppError::BadRequest("magnet is required".into()))?;

    if !magnet.starts_with("magnet:") {
        return Err(AppError::BadRequest("magnet is required".into()));
    }

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        render_player(magnet),
    )
        .into_response())
}

/// GET /api/v1/webtorrent/metadata
///
/// `type=movie` or `type=tv` restricts the search; without it movies are
/// tried before series. Series carry their seasons, specials excluded.
pub async fn metadata(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<ApiResponse<MediaMetadata>>> {
    let query = params
        .search_text()
        .ok_or_else(|| AppError::BadRequest("Query parameter is required".into()))?;
    let tmdb = state.tmdb()?;
    let language = params.language();

    let hint = params.media_type.as_deref().map(str::trim);
    let try_movie = !matches!(hint, Some("tv"));
    let try_tv = !matches!(hint, Some("movie"));

    if try_movie {
        if let Some(found) = movie_metadata(tmdb, query, language).await {
            return Ok(Json(ApiResponse::ok(found)));
        }
    }
    if try_tv {
        if let Some(found) = tv_metadata(tmdb, query, language).await {
            return Ok(Json(ApiResponse::ok(found)));
        }
    }

    Err(AppError::NotFound("Media not found".into()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn movie_metadata(tmdb: &TmdbClient, query: &str, language: &str) -> Option<MediaMetadata> {
    let found = tmdb
        .search_movies(query, 1, language, None, None)
        .await
        .map_err(|e| tracing::debug!(error = %e, "Movie search failed"))
        .ok()?;
    let first = found.results.first()?;
    let movie = tmdb
        .get_movie(first.id, language)
        .await
        .map_err(|e| tracing::debug!(id = first.id, error = %e, "Movie details failed"))
        .ok()?;

    Some(MediaMetadata {
        id: movie.id,
        title: movie.title,
        media_type: "movie",
        year: year_of(&movie.release_date),
        poster_path: build_image_proxy_url(&movie.poster_path, POSTER_SIZE),
        backdrop_path: build_image_proxy_url(&movie.backdrop_path, BACKDROP_SIZE),
        overview: movie.overview,
        seasons: None,
    })
}

async fn tv_metadata(tmdb: &TmdbClient, query: &str, language: &str) -> Option<MediaMetadata> {
    let found = tmdb
        .search_tv(query, 1, language, None)
        .await
        .map_err(|e| tracing::debug!(error = %e, "Series search failed"))
        .ok()?;
    let first = found.results.first()?;
    let tv = tmdb
        .get_tv(first.id, language)
        .await
        .map_err(|e| tracing::debug!(id = first.id, error = %e, "Series details failed"))
        .ok()?;

    // Futures are built up front so the stream holds no closure over borrowed
    // summaries across the await.
    let pending: Vec<_> = tv
        .seasons
        .iter()
        .filter(|s| s.season_number > 0)
        .cloned()
        .map(|summary| season_metadata(tmdb, tv.id, summary, language))
        .collect();
    let seasons = stream::iter(pending)
        .buffered(SEASON_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

    Some(MediaMetadata {
        id: tv.id,
        title: tv.name,
        media_type: "tv",
        year: year_of(&tv.first_air_date),
        poster_path: build_image_proxy_url(&tv.poster_path, POSTER_SIZE),
        backdrop_path: build_image_proxy_url(&tv.backdrop_path, BACKDROP_SIZE),
        overview: tv.overview,
        seasons: Some(seasons),
    })
}

/// A season with its episode list; an unavailable season keeps its
/// summary and an empty list.
async fn season_metadata(
    tmdb: &TmdbClient,
    tv_id: i64,
    summary: TmdbSeasonSummary,
    language: &str,
) -> SeasonMetadata {
    let episodes = match tmdb.get_season(tv_id, summary.season_number, language).await {
        Ok(details) => details
            .episodes
            .iter()
            .map(|ep| EpisodeMetadata {
                episode_number: ep.episode_number,
                name: ep.name.clone(),
            })
            .collect(),
        Err(e) => {
            tracing::debug!(
                tv_id,
                season = summary.season_number,
                error = %e,
                "Season details failed"
            );
            Vec::new()
        }
    };

    SeasonMetadata {
        season_number: summary.season_number,
        name: summary.name,
        episode_count: summary.episode_count,
        episodes,
    }
}

const PLAYER_STYLE: &str = "html,body{margin:0;height:100%;background:#000;color:#fff;font:14px sans-serif;}\
#status{position:fixed;top:12px;left:12px;z-index:2;opacity:.8;}\
video{width:100%;height:100%;}";

const PLAYER_SCRIPT: &str = "var status=document.getElementById('status');\
var client=new WebTorrent();\
client.on('error',function(err){status.textContent='Torrent error: '+err.message;});\
client.add(MAGNET,function(torrent){\
var videos=torrent.files.filter(function(f){return /\\.(mp4|mkv|webm|avi|mov|m4v)$/i.test(f.name);});\
if(!videos.length){status.textContent='No video files in torrent';return;}\
var file=videos.reduce(function(a,b){return a.length>=b.length?a:b;});\
status.textContent=file.name;\
file.renderTo('#player',{autoplay:true,controls:true});\
});";

/// Player page with the magnet embedded as a JS string literal.
fn render_player(magnet: &str) -> String {
    let literal = serde_json::to_string(magnet)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");

    format!(
        "<!DOCTYPE html><html><head><meta charset='utf-8'/><title>WebTorrent Player</title>\
<style>{PLAYER_STYLE}</style>\
<script src=\"https://cdn.jsdelivr.net/npm/webtorrent@latest/webtorrent.min.js\"></script>\
</head><body><div id=\"status\">Connecting to peers...</div><video id=\"player\"></video>\
<script>var MAGNET={literal};{PLAYER_SCRIPT}</script></body></html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_page_embeds_magnet_as_string_literal() {
        let html = render_player("magnet:?xt=urn:btih:abc&dn=</script>");
        assert!(html.contains(r#"var MAGNET="magnet:?xt=urn:btih:abc&dn=<\/script>";"#));
        assert!(html.contains("webtorrent.min.js"));
    }
}

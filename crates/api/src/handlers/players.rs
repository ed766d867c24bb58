//! Handlers for the `/players` resource.
//!
//! Each embed handler resolves a URL or markup for the requested title
//! and renders it through [`render_player_page`]. Lookup failures keep the
//! JSON error envelope.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use neomovies_providers::players::iframevideo::IframeVideoClient;
use neomovies_providers::players::rgshows::RgShowsClient;
use neomovies_providers::players::{
    links, render_player_page, Episode, IdType, PlayerEmbed, StreamResult,
};

use crate::error::{AppError, AppResult};
use crate::query::EpisodeParams;
use crate::state::AppState;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

// ---------------------------------------------------------------------------
// Embed players
// ---------------------------------------------------------------------------

/// GET /api/v1/players/alloha/{id_type}/{id}
pub async fn alloha(
    State(state): State<AppState>,
    Path((id_type, id)): Path<(String, String)>,
    Query(params): Query<EpisodeParams>,
) -> AppResult<Response> {
    let id_type: IdType = id_type.parse()?;
    let embed = state
        .alloha()?
        .embed(id_type, id.trim(), episode(&params), params.translation.as_deref())
        .await?;
    Ok(player_page("Alloha", &embed))
}

/// GET /api/v1/players/lumex/{id_type}/{id}
pub async fn lumex(
    State(state): State<AppState>,
    Path((id_type, id)): Path<(String, String)>,
    Query(params): Query<EpisodeParams>,
) -> AppResult<Response> {
    let id_type: IdType = id_type.parse()?;
    let embed = state.lumex()?.embed(id_type, id.trim(), episode(&params));
    Ok(player_page("Lumex", &embed))
}

/// GET /api/v1/players/vibix/{id_type}/{id}
pub async fn vibix(
    State(state): State<AppState>,
    Path((id_type, id)): Path<(String, String)>,
    Query(params): Query<EpisodeParams>,
) -> AppResult<Response> {
    let id_type: IdType = id_type.parse()?;
    let embed = state
        .vibix()?
        .embed(id_type, id.trim(), episode(&params))
        .await?;
    Ok(player_page("Vibix", &embed))
}

/// GET /api/v1/players/hdvb/{id_type}/{id}
pub async fn hdvb(
    State(state): State<AppState>,
    Path((id_type, id)): Path<(String, String)>,
    Query(params): Query<EpisodeParams>,
) -> AppResult<Response> {
    let id_type: IdType = id_type.parse()?;
    let embed = state
        .hdvb()?
        .embed(id_type, id.trim(), episode(&params))
        .await?;
    Ok(player_page("HDVB", &embed))
}

/// GET /api/v1/players/vidsrc/{media_type}/{imdb_id}
pub async fn vidsrc(
    Path((media_type, imdb_id)): Path<(String, String)>,
    Query(params): Query<EpisodeParams>,
) -> AppResult<Response> {
    let embed = links::vidsrc(media_type.trim(), imdb_id.trim(), episode(&params))?;
    Ok(player_page("Vidsrc", &embed))
}

/// GET /api/v1/players/vidlink/movie/{imdb_id}
pub async fn vidlink_movie(Path(imdb_id): Path<String>) -> Response {
    player_page("Vidlink", &links::vidlink_movie(imdb_id.trim()))
}

/// GET /api/v1/players/vidlink/tv/{tmdb_id}
pub async fn vidlink_tv(
    Path(tmdb_id): Path<String>,
    Query(params): Query<EpisodeParams>,
) -> AppResult<Response> {
    let embed = links::vidlink_tv(tmdb_id.trim(), episode(&params))?;
    Ok(player_page("Vidlink", &embed))
}

// ---------------------------------------------------------------------------
// Direct streams
// ---------------------------------------------------------------------------

/// GET /api/v1/players/rgshows/{tmdb_id}
pub async fn rgshows_movie(
    State(state): State<AppState>,
    Path(tmdb_id): Path<String>,
) -> AppResult<Response> {
    let url = state.rgshows.stream(tmdb_id.trim(), None).await?;
    Ok(player_page(RgShowsClient::NAME, &PlayerEmbed::Url(url)))
}

/// GET /api/v1/players/rgshows/{tmdb_id}/{season}/{episode}
pub async fn rgshows_episode(
    State(state): State<AppState>,
    Path((tmdb_id, season, episode)): Path<(String, i32, i32)>,
) -> AppResult<Response> {
    let url = state
        .rgshows
        .stream(tmdb_id.trim(), Some(Episode { season, episode }))
        .await?;
    Ok(player_page(RgShowsClient::NAME, &PlayerEmbed::Url(url)))
}

/// GET /api/v1/players/iframevideo/{kinopoisk_id}/{imdb_id}
pub async fn iframevideo(
    State(state): State<AppState>,
    Path((kinopoisk_id, imdb_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let url = state
        .iframevideo
        .stream(kinopoisk_id.trim(), imdb_id.trim())
        .await?;
    Ok(player_page(IframeVideoClient::NAME, &PlayerEmbed::Url(url)))
}

/// GET /api/v1/players/stream/{provider}/{tmdb_id}
///
/// Direct stream URL as JSON. A lookup failure is still a 200 with
/// `success: false`; only an unknown provider is a client error.
pub async fn stream(
    State(state): State<AppState>,
    Path((provider, tmdb_id)): Path<(String, String)>,
    Query(params): Query<EpisodeParams>,
) -> AppResult<Json<StreamResult>> {
    let provider = provider.trim();
    if !provider.eq_ignore_ascii_case(RgShowsClient::NAME) {
        return Err(AppError::BadRequest(format!(
            "Unsupported stream provider: {provider}"
        )));
    }

    let result = match state.rgshows.stream(tmdb_id.trim(), episode(&params)).await {
        Ok(url) => StreamResult::found(RgShowsClient::NAME, url),
        Err(e) => {
            tracing::warn!(error = %e, tmdb_id = %tmdb_id, "Stream lookup failed");
            StreamResult::failed(RgShowsClient::NAME, e)
        }
    };
    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn episode(params: &EpisodeParams) -> Option<Episode> {
    Episode::from_parts(params.season(), params.episode())
}

fn player_page(name: &str, embed: &PlayerEmbed) -> Response {
    (
        [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)],
        render_player_page(name, embed),
    )
        .into_response()
}

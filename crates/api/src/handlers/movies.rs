//! Handlers for the `/movies` resource.
//!
//! Every answer uses the unified envelope; errors carry the routed
//! `source` when routing got that far.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use neomovies_core::mapping::tmdb::map_page;
use neomovies_core::model::{UnifiedContent, UnifiedExternalIds};
use neomovies_core::source::{parse_content_id, Source};
use neomovies_core::types::MediaType;
use neomovies_providers::tmdb::{MovieList, Related};

use crate::error::{AppError, UnifiedError, UnifiedResult};
use crate::query::CatalogParams;
use crate::response::{UnifiedResponse, UnifiedSearchResponse};
use crate::services::catalog;
use crate::state::AppState;

/// GET /api/v1/movies/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> UnifiedResult<UnifiedSearchResponse> {
    let started = Instant::now();
    let fail = |e: AppError| UnifiedError::new(e, Some(Source::Tmdb), started);

    let query = params
        .search_text()
        .ok_or_else(|| fail(AppError::BadRequest("query parameter is required".into())))?;
    let found = catalog::tmdb(&state)
        .map_err(fail)?
        .search_movies(
            query,
            params.page(),
            params.language(),
            params.region(),
            params.year(),
        )
        .await
        .map_err(|e| fail(e.into()))?;

    Ok(Json(UnifiedSearchResponse::from_page(
        map_page(&found, MediaType::Movie),
        Source::Tmdb,
        started,
        Some(query.to_string()),
    )))
}

pub async fn popular(
    state: State<AppState>,
    params: Query<CatalogParams>,
) -> UnifiedResult<UnifiedSearchResponse> {
    list(state, params, MovieList::Popular).await
}

pub async fn top_rated(
    state: State<AppState>,
    params: Query<CatalogParams>,
) -> UnifiedResult<UnifiedSearchResponse> {
    list(state, params, MovieList::TopRated).await
}

pub async fn upcoming(
    state: State<AppState>,
    params: Query<CatalogParams>,
) -> UnifiedResult<UnifiedSearchResponse> {
    list(state, params, MovieList::Upcoming).await
}

pub async fn now_playing(
    state: State<AppState>,
    params: Query<CatalogParams>,
) -> UnifiedResult<UnifiedSearchResponse> {
    list(state, params, MovieList::NowPlaying).await
}

/// GET /api/v1/movies/{id}
///
/// `id` is `kp_NNN`, `tmdb_NNN` or a legacy bare number whose catalog
/// follows `source` or the language.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CatalogParams>,
) -> UnifiedResult<UnifiedResponse<UnifiedContent>> {
    let started = Instant::now();
    let language = params.language();

    let content_id = parse_content_id(&id).map_err(|e| UnifiedError::new(e, None, started))?;
    let source = catalog::route(&state, Some(content_id), params.explicit_source(), language)
        .map_err(|e| UnifiedError::new(e, None, started))?;

    let content = catalog::get_movie(&state, content_id.number(), source, language)
        .await
        .map_err(|e| UnifiedError::new(e, Some(source), started))?;

    Ok(Json(UnifiedResponse::new(content, source, started)))
}

pub async fn recommendations(
    state: State<AppState>,
    id: Path<String>,
    params: Query<CatalogParams>,
) -> UnifiedResult<UnifiedSearchResponse> {
    related(state, id, params, Related::Recommendations).await
}

pub async fn similar(
    state: State<AppState>,
    id: Path<String>,
    params: Query<CatalogParams>,
) -> UnifiedResult<UnifiedSearchResponse> {
    related(state, id, params, Related::Similar).await
}

/// GET /api/v1/movies/{id}/external-ids
pub async fn external_ids(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CatalogParams>,
) -> UnifiedResult<UnifiedResponse<UnifiedExternalIds>> {
    let started = Instant::now();
    let content_id = parse_content_id(&id).map_err(|e| UnifiedError::new(e, None, started))?;

    let (ids, source) =
        catalog::external_ids(&state, content_id, MediaType::Movie, params.language())
            .await
            .map_err(|e| UnifiedError::new(e, None, started))?;

    Ok(Json(UnifiedResponse::new(ids, source, started)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn list(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
    which: MovieList,
) -> UnifiedResult<UnifiedSearchResponse> {
    let started = Instant::now();
    let fail = |e: AppError| UnifiedError::new(e, Some(Source::Tmdb), started);

    let found = catalog::tmdb(&state)
        .map_err(fail)?
        .movie_list(which, params.page(), params.language(), params.region())
        .await
        .map_err(|e| fail(e.into()))?;

    Ok(Json(UnifiedSearchResponse::from_page(
        map_page(&found, MediaType::Movie),
        Source::Tmdb,
        started,
        None,
    )))
}

async fn related(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CatalogParams>,
    which: Related,
) -> UnifiedResult<UnifiedSearchResponse> {
    let started = Instant::now();
    let content_id = parse_content_id(&id).map_err(|e| UnifiedError::new(e, None, started))?;

    let (page, source) = catalog::related(
        &state,
        content_id,
        MediaType::Movie,
        which,
        params.page(),
        params.language(),
    )
    .await
    .map_err(|e| UnifiedError::new(e, None, started))?;

    Ok(Json(UnifiedSearchResponse::from_page(page, source, started, None)))
}

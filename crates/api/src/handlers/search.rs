//! Handlers for `/search` and `/search/multi`.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use neomovies_core::mapping::tmdb::map_multi_page;
use neomovies_core::source::Source;

use crate::error::{AppError, UnifiedError, UnifiedResult};
use crate::query::CatalogParams;
use crate::response::UnifiedSearchResponse;
use crate::services::catalog;
use crate::state::AppState;

/// GET /api/v1/search
///
/// Search on the catalog picked by `source` or the language. Kinopoisk
/// rows are enriched with TMDB ids where an IMDb id allows it.
pub async fn unified(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> UnifiedResult<UnifiedSearchResponse> {
    let started = Instant::now();
    let language = params.language();

    let query = params.search_text().ok_or_else(|| {
        UnifiedError::new(
            AppError::BadRequest("query parameter is required".into()),
            None,
            started,
        )
    })?;
    let source = catalog::route(&state, None, params.explicit_source(), language)
        .map_err(|e| UnifiedError::new(e, None, started).with_query(query))?;

    let page = catalog::search(&state, query, params.page(), source, language)
        .await
        .map_err(|e| UnifiedError::new(e, Some(source), started).with_query(query))?;

    Ok(Json(UnifiedSearchResponse::from_page(
        page,
        source,
        started,
        Some(query.to_string()),
    )))
}

/// GET /api/v1/search/multi
///
/// Movies and series from TMDB; people are dropped and `totalResults`
/// counts only what is kept.
pub async fn multi(
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
        .search_multi(query, params.page(), params.language())
        .await
        .map_err(|e| fail(e.into()))?;

    Ok(Json(UnifiedSearchResponse::from_page(
        map_multi_page(&found),
        Source::Tmdb,
        started,
        Some(query.to_string()),
    )))
}

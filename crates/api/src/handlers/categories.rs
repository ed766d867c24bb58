//! Handlers for the `/categories` resource (TMDB genres).

use std::collections::BTreeSet;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use neomovies_core::mapping::tmdb::map_page;
use neomovies_core::source::Source;
use neomovies_core::types::MediaType;
use serde::Serialize;

use crate::error::{AppError, AppResult, UnifiedError, UnifiedResult};
use crate::query::CatalogParams;
use crate::response::{ApiResponse, UnifiedSearchResponse};
use crate::services::catalog;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// GET /api/v1/categories
///
/// Movie and series genres merged, first occurrence of an id wins.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let tmdb = state.tmdb()?;
    let language = params.language();

    let (movie, tv) = futures::try_join!(
        tmdb.genres(MediaType::Movie, language),
        tmdb.genres(MediaType::Tv, language),
    )?;

    let mut seen = BTreeSet::new();
    let categories = movie
        .genres
        .iter()
        .chain(tv.genres.iter())
        .filter(|genre| seen.insert(genre.id))
        .map(|genre| Category {
            id: genre.id,
            name: genre.name.clone(),
            slug: slugify(&genre.name),
        })
        .collect();

    Ok(Json(ApiResponse::ok(categories)))
}

/// GET /api/v1/categories/{id}/media
///
/// Most popular titles of a genre. `type` is `movie` (default) or `tv`.
pub async fn media(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CatalogParams>,
) -> UnifiedResult<UnifiedSearchResponse> {
    let started = Instant::now();
    let fail = |e: AppError| UnifiedError::new(e, Some(Source::Tmdb), started);

    let genre_id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| fail(AppError::BadRequest("Invalid category ID".into())))?;
    let media_type = match params.media_type.as_deref().map(str::trim) {
        None | Some("") | Some("movie") => MediaType::Movie,
        Some("tv") => MediaType::Tv,
        Some(_) => {
            return Err(fail(AppError::BadRequest(
                "Media type must be 'movie' or 'tv'".into(),
            )))
        }
    };

    let found = catalog::tmdb(&state)
        .map_err(fail)?
        .discover_by_genre(media_type, genre_id, params.page(), params.language())
        .await
        .map_err(|e| fail(e.into()))?;

    Ok(Json(UnifiedSearchResponse::from_page(
        map_page(&found, media_type),
        Source::Tmdb,
        started,
        None,
    )))
}

/// Lowercase, letters and digits kept, whitespace runs become `-`.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

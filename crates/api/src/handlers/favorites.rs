//! Handlers for the `/favorites` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use neomovies_core::images::{build_image_proxy_url, POSTER_SIZE};
use neomovies_core::mapping::year_of;
use neomovies_core::types::MediaType;
use neomovies_db::models::favorite::{Favorite, FavoriteDetails};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::MediaTypeParams;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheck {
    pub is_favorite: bool,
}

/// GET /api/v1/favorites
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Favorite>>>> {
    let repos = state.repos().await?;
    let favorites = repos.favorites.list(&auth.user_id).await?;
    Ok(Json(
        ApiResponse::ok(favorites).with_message("Favorites retrieved successfully"),
    ))
}

/// POST /api/v1/favorites/{id}?type=movie|tv
///
/// Adding twice is a no-op. Title, poster, year and rating are copied from
/// TMDB when it answers; the favorite is stored either way.
pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(media_id): Path<String>,
    Query(params): Query<MediaTypeParams>,
) -> AppResult<Json<ApiResponse<()>>> {
    let media_id = media_id_of(&media_id)?;
    let media_type = media_type_of(&params)?;

    let details = fetch_details(&state, &media_id, media_type).await;
    let favorite = Favorite::new(&auth.user_id, &media_id, media_type, details, Utc::now());

    let repos = state.repos().await?;
    repos.favorites.add(&favorite).await?;

    tracing::info!(
        user_id = %auth.user_id,
        media_id = %media_id,
        media_type = %media_type,
        "Favorite added"
    );
    Ok(Json(ApiResponse::message("Added to favorites successfully")))
}

/// DELETE /api/v1/favorites/{id}?type=movie|tv
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(media_id): Path<String>,
    Query(params): Query<MediaTypeParams>,
) -> AppResult<Json<ApiResponse<()>>> {
    let media_id = media_id_of(&media_id)?;
    let media_type = media_type_of(&params)?;

    let repos = state.repos().await?;
    repos
        .favorites
        .remove(&auth.user_id, &media_id, media_type)
        .await?;

    Ok(Json(ApiResponse::message("Removed from favorites successfully")))
}

/// GET /api/v1/favorites/{id}/check?type=movie|tv
pub async fn check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(media_id): Path<String>,
    Query(params): Query<MediaTypeParams>,
) -> AppResult<Json<ApiResponse<FavoriteCheck>>> {
    let media_id = media_id_of(&media_id)?;
    let media_type = media_type_of(&params)?;

    let repos = state.repos().await?;
    let is_favorite = repos
        .favorites
        .exists(&auth.user_id, &media_id, media_type)
        .await?;

    Ok(Json(ApiResponse::ok(FavoriteCheck { is_favorite })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn media_id_of(raw: &str) -> AppResult<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("Media ID is required".into()));
    }
    Ok(id.to_string())
}

/// `movie` when absent; anything but `movie` or `tv` is rejected.
fn media_type_of(params: &MediaTypeParams) -> AppResult<MediaType> {
    match params.media_type.as_deref().map(str::trim) {
        None | Some("") => Ok(MediaType::Movie),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest("Media type must be 'movie' or 'tv'".into())),
    }
}

/// Best-effort catalog details; empty when TMDB is absent or fails.
async fn fetch_details(state: &AppState, media_id: &str, media_type: MediaType) -> FavoriteDetails {
    let (Some(tmdb), Ok(id)) = (state.tmdb.as_deref(), media_id.parse::<i64>()) else {
        return FavoriteDetails::default();
    };

    let fetched = match media_type {
        MediaType::Movie => tmdb.get_movie(id, "ru-RU").await.map(|movie| FavoriteDetails {
            title: movie.title,
            poster_path: build_image_proxy_url(&movie.poster_path, POSTER_SIZE),
            year: year_of(&movie.release_date),
            rating: movie.vote_average,
        }),
        MediaType::Tv => tmdb.get_tv(id, "ru-RU").await.map(|tv| FavoriteDetails {
            title: tv.name,
            poster_path: build_image_proxy_url(&tv.poster_path, POSTER_SIZE),
            year: year_of(&tv.first_air_date),
            rating: tv.vote_average,
        }),
    };

    fetched.unwrap_or_else(|e| {
        tracing::warn!(error = %e, media_id, "Favorite details unavailable");
        FavoriteDetails::default()
    })
}

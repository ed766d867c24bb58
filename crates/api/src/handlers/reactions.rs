//! Handlers for the `/reactions` resource.
//!
//! Local reactions live in the `reactions` collection; every change is
//! also queued to the public counter through [`ReactionMirror`]. Counts
//! are read from that counter directly.
//!
//! [`ReactionMirror`]: neomovies_events::ReactionMirror

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use neomovies_core::types::{MediaType, ReactionType};
use neomovies_db::models::reaction::Reaction;
use neomovies_providers::cub::{media_key, ReactionCounts};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{parse_page, parse_positive};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Page size of `/reactions/my` when `limit` is absent.
const DEFAULT_LIMIT: i32 = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SetReactionRequest {
    #[serde(rename = "type", default)]
    pub reaction_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MyReaction {
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub page: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/reactions/{mediaType}/{mediaId}/counts
///
/// Raw counter values. An unreachable counter reads as all zeros.
pub async fn counts(
    State(state): State<AppState>,
    Path((media_type, media_id)): Path<(String, String)>,
) -> AppResult<Json<ReactionCounts>> {
    let (media_type, media_id) = media_ref(&media_type, &media_id)?;
    let key = media_key(media_type.as_str(), &media_id);

    let counts = match state.cub.counts(&key).await {
        Ok(counts) => counts,
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "Reaction counts unavailable");
            ReactionCounts::default()
        }
    };
    Ok(Json(counts))
}

/// GET /api/v1/reactions/{mediaType}/{mediaId}/my-reaction
pub async fn my_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((media_type, media_id)): Path<(String, String)>,
) -> AppResult<Json<Option<MyReaction>>> {
    let (media_type, media_id) = media_ref(&media_type, &media_id)?;
    let repos = state.repos().await?;

    let reaction = repos
        .reactions
        .find(&auth.user_id, media_type, &media_id)
        .await?;
    Ok(Json(reaction.map(|r| MyReaction {
        reaction_type: r.reaction_type,
    })))
}

/// POST /api/v1/reactions/{mediaType}/{mediaId}
pub async fn set_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((media_type, media_id)): Path<(String, String)>,
    Json(input): Json<SetReactionRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let (media_type, media_id) = media_ref(&media_type, &media_id)?;

    // 1. Validate the tag.
    let raw = input
        .reaction_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Reaction type is required".into()))?;
    let reaction_type: ReactionType = raw.parse()?;

    // 2. Upsert locally.
    let repos = state.repos().await?;
    let reaction = Reaction::new(&auth.user_id, media_type, &media_id, reaction_type, Utc::now());
    repos.reactions.upsert(&reaction).await?;

    // 3. Mirror to the public counter.
    state
        .reaction_mirror
        .set(media_type.as_str(), &media_id, reaction_type);

    tracing::info!(
        user_id = %auth.user_id,
        media = %reaction.counter_key(),
        reaction = %reaction_type,
        "Reaction set"
    );
    Ok(Json(ApiResponse::message("Reaction set successfully")))
}

/// DELETE /api/v1/reactions/{mediaType}/{mediaId}
///
/// Removing a reaction that does not exist still succeeds.
pub async fn remove_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((media_type, media_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let (media_type, media_id) = media_ref(&media_type, &media_id)?;
    let repos = state.repos().await?;

    if let Some(removed) = repos
        .reactions
        .remove(&auth.user_id, media_type, &media_id)
        .await?
    {
        state
            .reaction_mirror
            .remove(media_type.as_str(), &media_id, removed.reaction_type);
    }

    Ok(Json(ApiResponse::message("Reaction removed successfully")))
}

/// GET /api/v1/reactions/my
pub async fn my_reactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Vec<Reaction>>>> {
    let limit = parse_positive(params.limit.as_deref()).unwrap_or(DEFAULT_LIMIT);
    let page = parse_page(params.page.as_deref());
    let skip = u64::from(page - 1) * limit as u64;

    let repos = state.repos().await?;
    let reactions = repos
        .reactions
        .list_by_user(&auth.user_id, skip, i64::from(limit))
        .await?;
    Ok(Json(ApiResponse::ok(reactions)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn media_ref(media_type: &str, media_id: &str) -> AppResult<(MediaType, String)> {
    let (media_type, media_id) = (media_type.trim(), media_id.trim());
    if media_type.is_empty() || media_id.is_empty() {
        return Err(AppError::BadRequest("Media type and ID are required".into()));
    }
    Ok((media_type.parse()?, media_id.to_string()))
}

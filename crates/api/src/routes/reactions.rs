//! Route definitions for the `/reactions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::reactions;
use crate::state::AppState;

/// Routes mounted at `/reactions`.
///
/// Everything but `counts` requires a bearer token.
///
/// ```text
/// GET    /my                                   -> my_reactions
/// GET    /{media_type}/{media_id}/counts       -> counts
/// GET    /{media_type}/{media_id}/my-reaction  -> my_reaction
/// POST   /{media_type}/{media_id}              -> set_reaction
/// DELETE /{media_type}/{media_id}              -> remove_reaction
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/my", get(reactions::my_reactions))
        .route("/{media_type}/{media_id}/counts", get(reactions::counts))
        .route(
            "/{media_type}/{media_id}/my-reaction",
            get(reactions::my_reaction),
        )
        .route(
            "/{media_type}/{media_id}",
            axum::routing::post(reactions::set_reaction).delete(reactions::remove_reaction),
        )
}

//! Route definitions for the `/movies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET /search                  -> search
/// GET /popular                 -> popular
/// GET /top-rated               -> top_rated
/// GET /upcoming                -> upcoming
/// GET /now-playing             -> now_playing
/// GET /{id}                    -> get_by_id
/// GET /{id}/recommendations    -> recommendations
/// GET /{id}/similar            -> similar
/// GET /{id}/external-ids       -> external_ids
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(movies::search))
        .route("/popular", get(movies::popular))
        .route("/top-rated", get(movies::top_rated))
        .route("/upcoming", get(movies::upcoming))
        .route("/now-playing", get(movies::now_playing))
        .route("/{id}", get(movies::get_by_id))
        .route("/{id}/recommendations", get(movies::recommendations))
        .route("/{id}/similar", get(movies::similar))
        .route("/{id}/external-ids", get(movies::external_ids))
}

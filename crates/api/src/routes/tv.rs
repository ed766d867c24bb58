//! Route definitions for the `/tv` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tv;
use crate::state::AppState;

/// Routes mounted at `/tv`.
///
/// ```text
/// GET /search                  -> search
/// GET /popular                 -> popular
/// GET /top-rated               -> top_rated
/// GET /on-the-air              -> on_the_air
/// GET /airing-today            -> airing_today
/// GET /{id}                    -> get_by_id
/// GET /{id}/recommendations    -> recommendations
/// GET /{id}/similar            -> similar
/// GET /{id}/external-ids       -> external_ids
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(tv::search))
        .route("/popular", get(tv::popular))
        .route("/top-rated", get(tv::top_rated))
        .route("/on-the-air", get(tv::on_the_air))
        .route("/airing-today", get(tv::airing_today))
        .route("/{id}", get(tv::get_by_id))
        .route("/{id}/recommendations", get(tv::recommendations))
        .route("/{id}/similar", get(tv::similar))
        .route("/{id}/external-ids", get(tv::external_ids))
}

//! Route definitions for the `/torrents` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::torrents;
use crate::state::AppState;

/// Routes mounted at `/torrents`.
///
/// ```text
/// GET /search/{imdbId}   -> search_by_imdb
/// GET /search            -> search_by_query
/// GET /movies            -> movies
/// GET /series            -> series
/// GET /anime             -> anime
/// GET /seasons           -> seasons
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search/{imdb_id}", get(torrents::search_by_imdb))
        .route("/search", get(torrents::search_by_query))
        .route("/movies", get(torrents::movies))
        .route("/series", get(torrents::series))
        .route("/anime", get(torrents::anime))
        .route("/seasons", get(torrents::seasons))
}

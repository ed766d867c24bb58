//! Route definitions for the `/categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET /               -> list
/// GET /{id}/media     -> media
/// GET /{id}/movies    -> media (legacy alias)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list))
        .route("/{id}/media", get(categories::media))
        .route("/{id}/movies", get(categories::media))
}

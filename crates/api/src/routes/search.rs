//! Route definitions for the `/search` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Routes mounted at `/search`.
///
/// ```text
/// GET /        -> unified
/// GET /multi   -> multi
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search::unified))
        .route("/multi", get(search::multi))
}

//! Route definitions for the `/favorites` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::favorites;
use crate::state::AppState;

/// Routes mounted at `/favorites`. All require a bearer token.
///
/// ```text
/// GET    /             -> list
/// POST   /{id}         -> add
/// DELETE /{id}         -> remove
/// GET    /{id}/check   -> check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::list))
        .route("/{id}", post(favorites::add).delete(favorites::remove))
        .route("/{id}/check", get(favorites::check))
}

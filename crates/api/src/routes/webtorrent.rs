//! Route definitions for the `/webtorrent` helpers.

use axum::routing::get;
use axum::Router;

use crate::handlers::webtorrent;
use crate::state::AppState;

/// Routes mounted at `/webtorrent`.
///
/// ```text
/// GET /player     -> player
/// GET /metadata   -> metadata
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/player", get(webtorrent::player))
        .route("/metadata", get(webtorrent::metadata))
}

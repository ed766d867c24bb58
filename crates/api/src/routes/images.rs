//! Route definitions for the `/images` proxy.

use axum::routing::get;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// GET /{size}/{*path}   -> proxy
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{size}/{*path}", get(images::proxy))
}

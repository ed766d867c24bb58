pub mod auth;
pub mod categories;
pub mod favorites;
pub mod health;
pub mod images;
pub mod movies;
pub mod players;
pub mod reactions;
pub mod search;
pub mod torrents;
pub mod tv;
pub mod webtorrent;

use axum::routing::get;
use axum::Router;

use crate::handlers::docs;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                          liveness
///
/// /auth/register, /verify, /resend-code            sign-up (public)
/// /auth/login, /refresh                            sessions (public)
/// /auth/google/login, /google/callback             Google sign-in (public)
/// /auth/profile                                    get, update, delete (requires auth)
/// /auth/revoke-token, /revoke-all-tokens           revocation (requires auth)
///
/// /search                                          unified search
/// /search/multi                                    TMDB multi search
/// /movies/{list}, /movies/{id}[/...]               movie catalog
/// /tv/{list}, /tv/{id}[/...]                       series catalog
/// /categories                                      genres
/// /categories/{id}/media                           titles of a genre
///
/// /players/{provider}/...                          HTML player pages
/// /players/stream/{provider}/{tmdb_id}             direct stream JSON
/// /torrents/search/{imdb_id}                       IMDb-keyed torrent search
/// /torrents/{movies|series|anime|seasons|search}   title and text searches
/// /webtorrent/player, /metadata                    in-browser playback
///
/// /reactions/{type}/{id}/counts                    public counters
/// /reactions/{type}/{id}[/my-reaction], /my        own reactions (requires auth)
/// /favorites[/{id}[/check]]                        favorites (requires auth)
///
/// /images/{size}/{*path}                           image proxy
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/search", search::router())
        .nest("/movies", movies::router())
        .nest("/tv", tv::router())
        .nest("/categories", categories::router())
        .nest("/players", players::router())
        .nest("/torrents", torrents::router())
        .nest("/webtorrent", webtorrent::router())
        .nest("/reactions", reactions::router())
        .nest("/favorites", favorites::router())
        .nest("/images", images::router())
}

/// Documentation routes served outside `/api/v1`.
///
/// ```text
/// GET /               -> docs::index
/// GET /openapi.json   -> docs::openapi
/// ```
pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(docs::index))
        .route("/openapi.json", get(docs::openapi))
}

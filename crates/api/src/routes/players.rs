//! Route definitions for the `/players` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::players;
use crate::state::AppState;

/// Routes mounted at `/players`.
///
/// ```text
/// GET /alloha/{id_type}/{id}                  -> alloha
/// GET /lumex/{id_type}/{id}                   -> lumex
/// GET /vibix/{id_type}/{id}                   -> vibix
/// GET /hdvb/{id_type}/{id}                    -> hdvb
/// GET /vidsrc/{media_type}/{imdb_id}          -> vidsrc
/// GET /vidlink/movie/{imdb_id}                -> vidlink_movie
/// GET /vidlink/tv/{tmdb_id}                   -> vidlink_tv
/// GET /rgshows/{tmdb_id}                      -> rgshows_movie
/// GET /rgshows/{tmdb_id}/{season}/{episode}   -> rgshows_episode
/// GET /iframevideo/{kinopoisk_id}/{imdb_id}   -> iframevideo
/// GET /stream/{provider}/{tmdb_id}            -> stream
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/alloha/{id_type}/{id}", get(players::alloha))
        .route("/lumex/{id_type}/{id}", get(players::lumex))
        .route("/vibix/{id_type}/{id}", get(players::vibix))
        .route("/hdvb/{id_type}/{id}", get(players::hdvb))
        .route("/vidsrc/{media_type}/{imdb_id}", get(players::vidsrc))
        .route("/vidlink/movie/{imdb_id}", get(players::vidlink_movie))
        .route("/vidlink/tv/{tmdb_id}", get(players::vidlink_tv))
        .route("/rgshows/{tmdb_id}", get(players::rgshows_movie))
        .route(
            "/rgshows/{tmdb_id}/{season}/{episode}",
            get(players::rgshows_episode),
        )
        .route(
            "/iframevideo/{kinopoisk_id}/{imdb_id}",
            get(players::iframevideo),
        )
        .route("/stream/{provider}/{tmdb_id}", get(players::stream))
}

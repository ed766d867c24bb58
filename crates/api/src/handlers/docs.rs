//! Handlers for the API documentation at `/` and `/openapi.json`.
//!
//! Both are generated from [`ENDPOINTS`], so the listing and the OpenAPI
//! paths cannot drift apart.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde_json::{json, Map, Value};

use crate::state::AppState;

/// `(method, path, summary, requires auth)`.
pub const ENDPOINTS: &[(&str, &str, &str, bool)] = &[
    ("get", "/api/v1/health", "Service health", false),
    ("post", "/api/v1/auth/register", "Register with email and password", false),
    ("post", "/api/v1/auth/verify", "Verify email with the 6-digit code", false),
    ("post", "/api/v1/auth/resend-code", "Send a new verification code", false),
    ("post", "/api/v1/auth/login", "Log in", false),
    ("post", "/api/v1/auth/refresh", "Rotate the refresh token", false),
    ("get", "/api/v1/auth/google/login", "Start Google sign-in", false),
    ("get", "/api/v1/auth/google/callback", "Google sign-in callback", false),
    ("get", "/api/v1/auth/profile", "Current user profile", true),
    ("put", "/api/v1/auth/profile", "Update name and avatar", true),
    ("delete", "/api/v1/auth/profile", "Delete the account", true),
    ("post", "/api/v1/auth/revoke-token", "Revoke one refresh token", true),
    ("post", "/api/v1/auth/revoke-all-tokens", "Revoke every refresh token", true),
    ("get", "/api/v1/search", "Unified search on the routed catalog", false),
    ("get", "/api/v1/search/multi", "Movies and series from the primary catalog", false),
    ("get", "/api/v1/movies/search", "Search movies", false),
    ("get", "/api/v1/movies/popular", "Popular movies", false),
    ("get", "/api/v1/movies/top-rated", "Top rated movies", false),
    ("get", "/api/v1/movies/upcoming", "Upcoming movies", false),
    ("get", "/api/v1/movies/now-playing", "Movies in theatres", false),
    ("get", "/api/v1/movies/{id}", "Movie details (NNN, kp_NNN or tmdb_NNN)", false),
    ("get", "/api/v1/movies/{id}/recommendations", "Recommended movies", false),
    ("get", "/api/v1/movies/{id}/similar", "Similar movies", false),
    ("get", "/api/v1/movies/{id}/external-ids", "Cross-catalog ids of a movie", false),
    ("get", "/api/v1/tv/search", "Search series", false),
    ("get", "/api/v1/tv/popular", "Popular series", false),
    ("get", "/api/v1/tv/top-rated", "Top rated series", false),
    ("get", "/api/v1/tv/on-the-air", "Series on the air", false),
    ("get", "/api/v1/tv/airing-today", "Series airing today", false),
    ("get", "/api/v1/tv/{id}", "Series details (NNN, kp_NNN or tmdb_NNN)", false),
    ("get", "/api/v1/tv/{id}/recommendations", "Recommended series", false),
    ("get", "/api/v1/tv/{id}/similar", "Similar series", false),
    ("get", "/api/v1/tv/{id}/external-ids", "Cross-catalog ids of a series", false),
    ("get", "/api/v1/categories", "Genres of movies and series", false),
    ("get", "/api/v1/categories/{id}/media", "Titles of a genre", false),
    ("get", "/api/v1/players/alloha/{id_type}/{id}", "Alloha player", false),
    ("get", "/api/v1/players/lumex/{id_type}/{id}", "Lumex player", false),
    ("get", "/api/v1/players/vibix/{id_type}/{id}", "Vibix player", false),
    ("get", "/api/v1/players/hdvb/{id_type}/{id}", "HDVB player", false),
    ("get", "/api/v1/players/vidsrc/{media_type}/{imdb_id}", "Vidsrc player", false),
    ("get", "/api/v1/players/vidlink/movie/{imdb_id}", "Vidlink movie player", false),
    ("get", "/api/v1/players/vidlink/tv/{tmdb_id}", "Vidlink series player", false),
    ("get", "/api/v1/players/rgshows/{tmdb_id}", "RgShows movie player", false),
    ("get", "/api/v1/players/rgshows/{tmdb_id}/{season}/{episode}", "RgShows episode player", false),
    ("get", "/api/v1/players/iframevideo/{kinopoisk_id}/{imdb_id}", "IframeVideo player", false),
    ("get", "/api/v1/players/stream/{provider}/{tmdb_id}", "Direct stream URL", false),
    ("get", "/api/v1/torrents/search/{imdbId}", "Torrents by IMDb id", false),
    ("get", "/api/v1/torrents/movies", "Movie torrents by title", false),
    ("get", "/api/v1/torrents/series", "Series torrents by title", false),
    ("get", "/api/v1/torrents/anime", "Anime torrents by title", false),
    ("get", "/api/v1/torrents/seasons", "Seasons available on the indexer", false),
    ("get", "/api/v1/torrents/search", "Free-text torrent search", false),
    ("get", "/api/v1/reactions/{mediaType}/{mediaId}/counts", "Public reaction counters", false),
    ("get", "/api/v1/reactions/{mediaType}/{mediaId}/my-reaction", "Own reaction", true),
    ("post", "/api/v1/reactions/{mediaType}/{mediaId}", "Set a reaction", true),
    ("delete", "/api/v1/reactions/{mediaType}/{mediaId}", "Remove a reaction", true),
    ("get", "/api/v1/reactions/my", "Own reactions, newest first", true),
    ("get", "/api/v1/favorites", "Favorites", true),
    ("post", "/api/v1/favorites/{id}", "Add a favorite", true),
    ("delete", "/api/v1/favorites/{id}", "Remove a favorite", true),
    ("get", "/api/v1/favorites/{id}/check", "Whether a title is a favorite", true),
    ("get", "/api/v1/images/{size}/{path}", "Image proxy", false),
    ("get", "/api/v1/webtorrent/player", "WebTorrent player page", false),
    ("get", "/api/v1/webtorrent/metadata", "Title metadata for the WebTorrent player", false),
];

/// GET /
///
/// HTML index of every endpoint.
pub async fn index() -> Html<String> {
    let rows: String = ENDPOINTS
        .iter()
        .map(|(method, path, summary, auth)| {
            format!(
                "<tr><td><code>{}</code></td><td><code>{}</code></td><td>{}{}</td></tr>",
                method.to_ascii_uppercase(),
                path,
                summary,
                if *auth { " (auth)" } else { "" }
            )
        })
        .collect();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Neo Movies API</title>
<style>body{{font-family:sans-serif;margin:2rem;background:#111;color:#eee}}td{{padding:4px 12px}}code{{color:#8cf}}a{{color:#8cf}}</style>
</head>
<body>
<h1>Neo Movies API</h1>
<p>Machine-readable description: <a href="/openapi.json">/openapi.json</a></p>
<table>{rows}</table>
</body>
</html>"#
    ))
}

/// GET /openapi.json
pub async fn openapi(State(state): State<AppState>) -> Json<Value> {
    Json(openapi_document(&state.config.base_url))
}

pub fn openapi_document(base_url: &str) -> Value {
    let mut paths = Map::new();
    for (method, path, summary, auth) in ENDPOINTS {
        let mut operation = json!({
            "summary": summary,
            "responses": { "200": { "description": "Success" } },
        });
        if *auth {
            operation["security"] = json!([{ "bearerAuth": [] }]);
        }
        let entry = paths
            .entry(path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        entry[*method] = operation;
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Neo Movies API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "servers": [{ "url": base_url }],
        "paths": paths,
        "components": {
            "securitySchemes": {
                "bearerAuth": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_groups_methods_under_one_path() {
        let doc = openapi_document("http://localhost:3000");
        let profile = &doc["paths"]["/api/v1/auth/profile"];
        assert!(profile["get"].is_object());
        assert!(profile["put"].is_object());
        assert!(profile["delete"]["security"].is_array());
        assert_eq!(doc["servers"][0]["url"], "http://localhost:3000");
    }
}

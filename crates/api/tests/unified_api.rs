//! Integration tests for the catalog endpoints and their unified envelope,
//! against fake Kinopoisk and TMDB upstreams.

mod common;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get as route_get;
use axum::{Json, Router};
use common::{body_json, get, spawn_upstream, test_config, TestApp};
use serde_json::json;
use std::collections::HashMap;

/// Fake catalogs: Kinopoisk under `/kp`, TMDB under `/tmdb`.
fn fake_catalogs() -> Router {
    Router::new()
        .route(
            "/kp/v2.2/films/{id}",
            route_get(|Path(id): Path<i64>| async move {
                match id {
                    326 => Ok(Json(json!({
                        "kinopoiskId": 326,
                        "imdbId": "tt0111161",
                        "nameRu": "Побег из Шоушенка",
                        "nameOriginal": "The Shawshank Redemption",
                        "posterUrl": "https://kinopoiskapiunofficial.tech/images/posters/kp/326.jpg",
                        "ratingKinopoisk": 9.1,
                        "year": 1994,
                        "type": "FILM"
                    }))),
                    464963 => Ok(Json(json!({
                        "kinopoiskId": 464963,
                        "imdbId": "tt0944947",
                        "nameRu": "Игра престолов",
                        "nameOriginal": "Game of Thrones",
                        "year": 2011,
                        "type": "TV_SERIES"
                    }))),
                    // A series TMDB has no IMDb match for.
                    77044 => Ok(Json(json!({
                        "kinopoiskId": 77044,
                        "imdbId": "tt0108778",
                        "nameRu": "Друзья",
                        "nameOriginal": "Friends",
                        "year": 1994,
                        "type": "TV_SERIES"
                    }))),
                    _ => Err(StatusCode::NOT_FOUND),
                }
            }),
        )
        .route(
            "/tmdb/find/{imdb}",
            route_get(|Path(imdb): Path<String>| async move {
                match imdb.as_str() {
                    "tt0111161" => Json(json!({
                        "movie_results": [{ "id": 278, "title": "The Shawshank Redemption" }],
                        "tv_results": []
                    })),
                    "tt0944947" => Json(json!({
                        "movie_results": [],
                        "tv_results": [{ "id": 1399, "name": "Game of Thrones" }]
                    })),
                    _ => Json(json!({ "movie_results": [], "tv_results": [] })),
                }
            }),
        )
        .route(
            "/tmdb/movie/{id}",
            route_get(|Path(id): Path<i64>| async move {
                if id == 999999 {
                    return Err((
                        StatusCode::NOT_FOUND,
                        Json(json!({ "status_message": "The resource could not be found." })),
                    ));
                }
                Ok(Json(json!({
                    "id": id,
                    "title": "Fight Club",
                    "release_date": "1999-10-15",
                    "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"
                })))
            }),
        )
        .route(
            "/tmdb/movie/{id}/external_ids",
            route_get(|| async { Json(json!({ "imdb_id": "tt0137523" })) }),
        )
        .route(
            "/tmdb/tv/{id}",
            route_get(|Path(id): Path<i64>| async move {
                if id != 1399 {
                    return Err(StatusCode::NOT_FOUND);
                }
                Ok(Json(json!({
                    "id": 1399,
                    "name": "Game of Thrones",
                    "original_name": "Game of Thrones",
                    "first_air_date": "2011-04-17",
                    "last_air_date": "2019-05-19",
                    "poster_path": "/1XS1oqL89opfnbLl8WnZY1O1uJx.jpg",
                    "seasons": [
                        { "id": 3627, "name": "Season 1", "season_number": 1, "episode_count": 10 }
                    ]
                })))
            }),
        )
        .route(
            "/tmdb/tv/{id}/external_ids",
            route_get(|| async { Json(json!({ "imdb_id": "tt0944947" })) }),
        )
        .route(
            "/tmdb/search/multi",
            route_get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("query").map(String::as_str), Some("matrix"));
                assert_eq!(params.get("language").map(String::as_str), Some("en-US"));
                Json(json!({
                    "page": 1,
                    "total_pages": 1,
                    "total_results": 3,
                    "results": [
                        { "id": 603, "media_type": "movie", "title": "The Matrix" },
                        { "id": 1399, "media_type": "tv", "name": "Matrix Show" },
                        { "id": 6384, "media_type": "person", "name": "Keanu Reeves" }
                    ]
                }))
            }),
        )
}

async fn app_with_catalogs() -> TestApp {
    let base = spawn_upstream(fake_catalogs()).await;
    let mut config = test_config();
    config.upstreams.kpapi_key = Some("kp-key".into());
    config.upstreams.kpapi_base_url = format!("{base}/kp");
    config.upstreams.tmdb_access_token = Some("tmdb-token".into());
    config.upstreams.tmdb_base_url = format!("{base}/tmdb");
    common::build_test_app(config)
}

// ---------------------------------------------------------------------------
// Test: kp_ id is served from Kinopoisk and enriched with the TMDB id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn kinopoisk_movie_is_enriched_with_tmdb_id() {
    let app = app_with_catalogs().await;
    let response = get(app.app(), "/api/v1/movies/kp_326?lang=ru").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["source"], "kp");
    assert_eq!(json["data"]["type"], "movie");
    assert_eq!(json["data"]["sourceId"], "kp_326");
    assert_eq!(json["data"]["externalIds"]["kp"], 326);
    assert_eq!(json["data"]["externalIds"]["imdb"], "tt0111161");
    assert_eq!(json["data"]["externalIds"]["tmdb"], 278);
    assert!(json["data"]["posterUrl"]
        .as_str()
        .unwrap()
        .starts_with("/api/v1/images/kp_"));
    assert_eq!(json["metadata"]["apiVersion"], "3.0");
}

// ---------------------------------------------------------------------------
// Test: tmdb_ id is served from TMDB with proxied image paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tmdb_movie_uses_image_proxy_urls() {
    let app = app_with_catalogs().await;
    let response = get(app.app(), "/api/v1/movies/tmdb_550?lang=en").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "tmdb");
    assert_eq!(json["data"]["sourceId"], "tmdb_550");
    assert_eq!(json["data"]["externalIds"]["tmdb"], 550);
    assert_eq!(json["data"]["externalIds"]["imdb"], "tt0137523");
    assert_eq!(
        json["data"]["posterUrl"],
        "/api/v1/images/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"
    );
}

// ---------------------------------------------------------------------------
// Test: a bare Kinopoisk series id is upgraded to its TMDB record
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bare_kinopoisk_series_is_upgraded_to_tmdb() {
    let app = app_with_catalogs().await;

    for uri in [
        "/api/v1/tv/464963?id_type=kp&lang=en",
        "/api/v1/tv/464963?lang=ru",
    ] {
        let response = get(app.app(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["source"], "tmdb", "{uri}");
        assert_eq!(json["data"]["sourceId"], "tmdb_1399");
        assert_eq!(json["data"]["title"], "Game of Thrones");
        assert_eq!(json["data"]["externalIds"]["tmdb"], 1399);
        assert_eq!(json["data"]["externalIds"]["kp"], 464963);
        assert_eq!(json["data"]["seasons"][0]["seasonNumber"], 1);
    }
}

// ---------------------------------------------------------------------------
// Test: no TMDB match keeps the Kinopoisk record
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unmatched_kinopoisk_series_stays_on_kinopoisk() {
    let app = app_with_catalogs().await;
    let response = get(app.app(), "/api/v1/tv/77044?id_type=kp").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "kp");
    assert_eq!(json["data"]["sourceId"], "kp_77044");
    assert_eq!(json["data"]["type"], "tv");
    assert_eq!(json["data"]["externalIds"]["kp"], 77044);
    assert!(json["data"]["externalIds"]["tmdb"].is_null());
}

// ---------------------------------------------------------------------------
// Test: prefixed series ids stay on the catalog they name
// ---------------------------------------------------------------------------

#[tokio::test]
async fn prefixed_series_ids_are_not_upgraded() {
    let app = app_with_catalogs().await;

    let response = get(app.app(), "/api/v1/tv/kp_464963").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "kp");
    assert_eq!(json["data"]["sourceId"], "kp_464963");
    assert_eq!(json["data"]["externalIds"]["tmdb"], 1399);

    let response = get(app.app(), "/api/v1/tv/tmdb_1399?lang=ru").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "tmdb");
    assert_eq!(json["data"]["sourceId"], "tmdb_1399");
    assert_eq!(json["data"]["externalIds"]["imdb"], "tt0944947");
}

// ---------------------------------------------------------------------------
// Test: id_type=tmdb overrides the Russian default
// ---------------------------------------------------------------------------

#[tokio::test]
async fn id_type_tmdb_overrides_language_default() {
    let app = app_with_catalogs().await;
    let response = get(app.app(), "/api/v1/tv/1399?id_type=tmdb&lang=ru").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "tmdb");
    assert_eq!(json["data"]["sourceId"], "tmdb_1399");

    let response = get(app.app(), "/api/v1/tv/1399?id_type=imdb").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: multi search drops people and recounts the total
// ---------------------------------------------------------------------------

#[tokio::test]
async fn multi_search_keeps_only_movies_and_series() {
    let app = app_with_catalogs().await;
    let response = get(app.app(), "/api/v1/search/multi?query=matrix&page=1&lang=en").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["type"], "movie");
    assert_eq!(data[1]["type"], "tv");
    assert_eq!(json["pagination"]["totalResults"], 2);
    assert_eq!(json["metadata"]["query"], "matrix");
}

// ---------------------------------------------------------------------------
// Test: an upstream 404 becomes a 502 naming the source
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_error_maps_to_bad_gateway_with_source() {
    let app = app_with_catalogs().await;
    let response = get(app.app(), "/api/v1/movies/tmdb_999999?lang=en").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "TMDB API error: 404");
    assert_eq!(json["source"], "tmdb");
}

// ---------------------------------------------------------------------------
// Test: unconfigured catalog answers 502 without falling back
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unconfigured_catalog_is_bad_gateway() {
    let app = common::build_test_app(test_config());

    let response = get(app.app(), "/api/v1/movies/kp_326").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Kinopoisk service not configured");
    assert_eq!(json["source"], "kp");

    let response = get(app.app(), "/api/v1/movies/550?lang=ru").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"], "TMDB service not configured");
}

// ---------------------------------------------------------------------------
// Test: malformed ids and missing queries are 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_ids_and_missing_query_are_rejected() {
    let app = app_with_catalogs().await;

    let response = get(app.app(), "/api/v1/movies/imdb_123").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json.get("source").is_none());

    let response = get(app.app(), "/api/v1/search/multi?query=%20").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "query parameter is required");
}

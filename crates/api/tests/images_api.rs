//! Integration tests for the image proxy and its placeholders.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Uri;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get as route_get;
use axum::Router;
use common::{body_bytes, get, send, spawn_upstream, test_config};

const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg";

/// Image host that rejects any request carrying a `Referer`, counting hits.
/// `/w500/ua.jpg` only answers a specific user agent.
async fn strict_cdn(hits: Arc<AtomicUsize>) -> String {
    let app = Router::new()
        .route(
            "/w500/abc.jpg",
            route_get(
                |State(hits): State<Arc<AtomicUsize>>, headers: HeaderMap| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    if headers.contains_key(header::REFERER) {
                        return StatusCode::FORBIDDEN.into_response();
                    }
                    ([(header::CONTENT_TYPE, "image/jpeg")], JPEG_BYTES).into_response()
                },
            ),
        )
        .route(
            "/w500/ua.jpg",
            route_get(|headers: HeaderMap| async move {
                let ua = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok());
                if ua != Some("NeoMoviesTest/1.0") {
                    return StatusCode::FORBIDDEN.into_response();
                }
                ([(header::CONTENT_TYPE, "image/png")], JPEG_BYTES).into_response()
            }),
        )
        .with_state(hits);
    spawn_upstream(app).await
}

// ---------------------------------------------------------------------------
// Test: a 403 on the first attempt is retried without the referer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn proxy_retries_without_referer_and_serves_image() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = strict_cdn(Arc::clone(&hits)).await;
    let mut config = test_config();
    config.upstreams.tmdb_image_base_url = base;
    let app = common::build_test_app(config);

    let response = get(app.app(), "/api/v1/images/w500/%2Fabc.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=31536000"
    );
    assert_eq!(body_bytes(response).await, JPEG_BYTES);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// Test: the caller's user agent is forwarded upstream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn proxy_forwards_user_agent() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = strict_cdn(hits).await;
    let mut config = test_config();
    config.upstreams.tmdb_image_base_url = base;
    let app = common::build_test_app(config);

    let request = Request::builder()
        .uri("/api/v1/images/w500/ua.jpg")
        .header(header::USER_AGENT, "NeoMoviesTest/1.0")
        .body(Body::empty())
        .unwrap();
    let response = send(app.app(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    // Without the caller's agent the CDN refuses and the placeholder is served.
    let response = get(app.app(), "/api/v1/images/w500/ua.jpg").await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
}

// ---------------------------------------------------------------------------
// Test: unreachable upstream falls back to the inline SVG
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_fetch_serves_svg_placeholder() {
    let app = common::build_test_app(test_config());
    let response = get(app.app(), "/api/v1/images/w500/missing.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=3600"
    );
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.starts_with("<svg"));
}

// ---------------------------------------------------------------------------
// Test: a placeholder file on disk wins over the SVG
// ---------------------------------------------------------------------------

#[tokio::test]
async fn placeholder_file_is_served_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("placeholder.jpg");
    std::fs::write(&file, JPEG_BYTES).unwrap();

    let mut config = test_config();
    config.placeholder_files = vec![dir.path().join("absent.jpg"), file];
    let app = common::build_test_app(config);

    let response = get(app.app(), "/api/v1/images/w342/placeholder.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(body_bytes(response).await, JPEG_BYTES);
}

// ---------------------------------------------------------------------------
// Test: a chunked upstream body is streamed through
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chunked_upstream_body_is_streamed() {
    let cdn = Router::new().route(
        "/original/big.jpg",
        route_get(|| async {
            let chunks = (0..3u8).map(|i| Ok::<_, std::io::Error>(vec![i; 4096]));
            (
                [(header::CONTENT_TYPE, "image/jpeg")],
                Body::from_stream(futures::stream::iter(chunks)),
            )
        }),
    );
    let mut config = test_config();
    config.upstreams.tmdb_image_base_url = spawn_upstream(cdn).await;
    let app = common::build_test_app(config);

    let response = get(app.app(), "/api/v1/images/original/big.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    let body = body_bytes(response).await;
    assert_eq!(body.len(), 3 * 4096);
    assert!(body[..4096].iter().all(|b| *b == 0));
    assert!(body[2 * 4096..].iter().all(|b| *b == 2));
}

// ---------------------------------------------------------------------------
// Test: the upstream length is forwarded
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_content_length_is_forwarded() {
    let cdn = Router::new().route(
        "/w185/small.jpg",
        route_get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], JPEG_BYTES) }),
    );
    let mut config = test_config();
    config.upstreams.tmdb_image_base_url = spawn_upstream(cdn).await;
    let app = common::build_test_app(config);

    let response = get(app.app(), "/api/v1/images/w185/small.jpg").await;

    assert_eq!(
        response.headers()[header::CONTENT_LENGTH],
        JPEG_BYTES.len().to_string().as_str()
    );
    assert_eq!(body_bytes(response).await, JPEG_BYTES);
}

// ---------------------------------------------------------------------------
// Test: a literal %25 in the path is decoded only once
// ---------------------------------------------------------------------------

#[tokio::test]
async fn percent_sequence_in_path_is_decoded_once() {
    // Echoes the raw request path back as the image body.
    let cdn = Router::new().fallback(|uri: Uri| async move {
        ([(header::CONTENT_TYPE, "image/jpeg")], uri.path().to_string())
    });
    let mut config = test_config();
    config.upstreams.tmdb_image_base_url = spawn_upstream(cdn).await;
    let app = common::build_test_app(config);

    let response = get(app.app(), "/api/v1/images/w500/a%2525b.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"/w500/a%25b.jpg");
}

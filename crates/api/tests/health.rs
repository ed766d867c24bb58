//! Integration tests for the health check, docs and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_bytes, body_json, get, send, test_config};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with the service payload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = common::build_test_app(test_config());
    let response = get(app.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "OK");
    assert_eq!(json["data"]["service"], "neomovies-api");
    assert!(json["data"]["version"].is_string());
    assert!(json["data"]["uptime"].is_u64());
}

// ---------------------------------------------------------------------------
// Test: health is also mounted under /api/v1
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_is_mounted_under_api_prefix() {
    let app = common::build_test_app(test_config());
    let response = get(app.app(), "/api/v1/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "OK");
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(test_config());
    let response = get(app.app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app(test_config());
    let response = get(app.app(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight mirrors the caller's origin
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_mirrors_origin_with_credentials() {
    let app = common::build_test_app(test_config());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/favorites")
        .header(header::ORIGIN, "https://neomovies.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();
    let response = send(app.app(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://neomovies.example"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

// ---------------------------------------------------------------------------
// Test: docs page and OpenAPI document are served at the root
// ---------------------------------------------------------------------------

#[tokio::test]
async fn docs_are_served_at_root() {
    let app = common::build_test_app(test_config());

    let response = get(app.app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("/api/v1/movies/{id}"));

    let response = get(app.app(), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"].is_object());
}

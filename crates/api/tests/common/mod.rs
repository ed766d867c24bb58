#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use tower::ServiceExt;

use neomovies_api::auth::jwt::generate_access_token;
use neomovies_api::auth::password::hash_password;
use neomovies_api::config::{ServerConfig, UpstreamConfig};
use neomovies_api::router::build_app_router;
use neomovies_api::state::AppState;
use neomovies_db::models::user::User;
use neomovies_db::{DbHandle, Repositories};
use neomovies_events::Dispatcher;

/// Address nothing listens on; requests to it fail fast.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Build a test `ServerConfig`.
///
/// No catalog keys are set and every upstream points at [`UNREACHABLE`],
/// so a test only talks to the fakes it wires in itself.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        upstreams: UpstreamConfig {
            tmdb_base_url: UNREACHABLE.to_string(),
            tmdb_image_base_url: UNREACHABLE.to_string(),
            kpapi_base_url: UNREACHABLE.to_string(),
            redapi_base_url: UNREACHABLE.to_string(),
            alloha_base_url: UNREACHABLE.to_string(),
            vibix_host: UNREACHABLE.to_string(),
            hdvb_base_url: UNREACHABLE.to_string(),
            rgshows_base_url: UNREACHABLE.to_string(),
            iframevideo_api_host: UNREACHABLE.to_string(),
            iframevideo_cdn_host: UNREACHABLE.to_string(),
            cub_base_url: UNREACHABLE.to_string(),
            ..UpstreamConfig::default()
        },
        placeholder_files: Vec::new(),
        ..ServerConfig::default()
    }
}

/// The app under test plus the in-memory store behind it.
pub struct TestApp {
    pub router: Router,
    pub repos: Repositories,
    pub config: ServerConfig,
}

impl TestApp {
    /// A fresh clone of the router, ready for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Insert a verified local user and return a bearer token for it.
    pub async fn login_as(&self, email: &str) -> (User, String) {
        let hash = hash_password("password123").unwrap();
        let mut user = User::new_local(email, hash, "Tester", Utc::now());
        user.verified = true;
        self.repos.users.create(&user).await.unwrap();

        let token = generate_access_token(&user.id, &self.config.jwt).unwrap();
        (user, token)
    }
}

/// Build the full application router on in-memory repositories.
///
/// Uses [`build_app_router`] so the middleware stack is the one
/// production runs.
pub fn build_test_app(config: ServerConfig) -> TestApp {
    let repos = Repositories::in_memory();
    let db = DbHandle::ready(repos.clone());
    let state = AppState::build(config.clone(), db, Dispatcher::start()).unwrap();
    let router = build_app_router(state, &config);

    TestApp {
        router,
        repos,
        config,
    }
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

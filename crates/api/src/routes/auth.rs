//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// Profile and revocation routes require a bearer token (enforced by the
/// `AuthUser` extractor).
///
/// ```text
/// POST   /register            -> register
/// POST   /verify              -> verify_email
/// POST   /resend-code         -> resend_code
/// POST   /login               -> login
/// POST   /refresh             -> refresh
/// GET    /google/login        -> google_login
/// GET    /google/callback     -> google_callback
/// GET    /profile             -> get_profile
/// PUT    /profile             -> update_profile
/// DELETE /profile             -> delete_profile
/// POST   /revoke-token        -> revoke_token
/// POST   /revoke-all-tokens   -> revoke_all_tokens
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/verify", post(auth::verify_email))
        .route("/resend-code", post(auth::resend_code))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/google/login", get(auth::google_login))
        .route("/google/callback", get(auth::google_callback))
        .route(
            "/profile",
            get(auth::get_profile)
                .put(auth::update_profile)
                .delete(auth::delete_profile),
        )
        .route("/revoke-token", post(auth::revoke_token))
        .route("/revoke-all-tokens", post(auth::revoke_all_tokens))
}

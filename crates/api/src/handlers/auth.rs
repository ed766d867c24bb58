//! Handlers for the `/auth` resource (registration, verification, login,
//! refresh, profile, token revocation and Google sign-in).

use axum::extract::{Query, State};
use axum::http::header::{ACCEPT, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use neomovies_core::error::CoreError;
use neomovies_db::models::user::{
    RefreshToken, UpdateProfile, User, UserResponse, PROVIDER_GOOGLE,
};
use neomovies_db::{DbError, Repositories};
use neomovies_providers::google::GoogleUserInfo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::codes::{
    oauth_state, verification_code, OAUTH_STATE_MAX_AGE_SECS, VERIFICATION_CODE_TTL_MINS,
};
use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RequestMeta};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Cookie holding the OAuth `state` between login and callback.
const OAUTH_STATE_COOKIE: &str = "oauth_state";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// Request body for `POST /auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

/// Request body for `POST /auth/resend-code`.
#[derive(Debug, Deserialize)]
pub struct ResendCodeRequest {
    pub email: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/revoke-token`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens plus the public user, returned by login, refresh and Google
/// sign-in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    /// `json` forces a JSON answer instead of a redirect.
    pub response: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an unverified local account and email a 6-digit code.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    // 1. Validate input.
    input
        .validate()
        .map_err(|_| AppError::BadRequest("Invalid email address".into()))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;
    let email = normalize_email(&input.email);

    // 2. Reject known emails.
    let repos = state.repos().await?;
    if repos.users.find_by_email(&email).await?.is_some() {
        return Err(email_taken());
    }

    // 3. Create the user with a pending code.
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let now = Utc::now();
    let mut user = User::new_local(&email, password_hash, input.name.trim(), now);
    let code = verification_code();
    user.verification_code = Some(code.clone());
    user.verification_expires = Some(now + Duration::minutes(VERIFICATION_CODE_TTL_MINS));

    repos.users.create(&user).await.map_err(|e| match e {
        DbError::Duplicate { .. } => email_taken(),
        other => other.into(),
    })?;
    tracing::info!(user_id = %user.id, "User registered");

    // 4. Send the code in the background.
    send_code(&state, email, code);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message(
            "Registered. Check email for verification code.",
        )),
    ))
}

/// POST /api/v1/auth/verify
pub async fn verify_email(
    State(state): State<AppState>,
    Json(input): Json<VerifyRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repos = state.repos().await?;
    let mut user = find_by_email(&repos, &input.email).await?;

    if user.verified {
        return Ok(Json(ApiResponse::message("Email already verified")));
    }

    let now = Utc::now();
    if !user.verification_code_matches(&input.code, now) {
        return Err(AppError::BadRequest(
            "invalid or expired verification code".into(),
        ));
    }

    user.verified = true;
    user.verification_code = None;
    user.verification_expires = None;
    user.updated_at = now;
    repos.users.update(&user).await?;

    Ok(Json(ApiResponse::message("Email verified successfully")))
}

/// POST /api/v1/auth/resend-code
pub async fn resend_code(
    State(state): State<AppState>,
    Json(input): Json<ResendCodeRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repos = state.repos().await?;
    let mut user = find_by_email(&repos, &input.email).await?;

    if user.verified {
        return Err(AppError::BadRequest("email already verified".into()));
    }

    let now = Utc::now();
    let code = verification_code();
    user.verification_code = Some(code.clone());
    user.verification_expires = Some(now + Duration::minutes(VERIFICATION_CODE_TTL_MINS));
    user.updated_at = now;
    repos.users.update(&user).await?;

    send_code(&state, user.email.clone(), code);

    Ok(Json(ApiResponse::message(
        "Verification code sent to your email",
    )))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    // 1. Find user by email.
    let repos = state.repos().await?;
    let mut user = repos
        .users
        .find_by_email(&normalize_email(&input.email))
        .await?
        .ok_or_else(|| unauthorized("User not found"))?;

    // 2. Require a verified email.
    if !user.verified {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account not activated. Please verify your email.".into(),
        )));
    }

    // 3. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .unwrap_or_else(|e| {
            tracing::warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
            false
        });
    if !password_valid {
        return Err(unauthorized("Invalid password"));
    }

    // 4. Issue tokens.
    let response = issue_tokens(&state, &repos, &mut user, &meta).await?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(
        ApiResponse::ok(response).with_message("Login successful"),
    ))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new access/refresh pair. The presented
/// token is consumed.
pub async fn refresh(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let invalid = || unauthorized("invalid or expired refresh token");

    // 1. Find the owner by token hash.
    let token_hash = hash_refresh_token(&input.refresh_token);
    let repos = state.repos().await?;
    let mut user = repos
        .users
        .find_by_refresh_token(&token_hash)
        .await?
        .ok_or_else(invalid)?;

    // 2. Consume the token; an expired one is still removed.
    let now = Utc::now();
    let presented = user
        .refresh_tokens
        .iter()
        .position(|t| t.token == token_hash)
        .map(|i| user.refresh_tokens.remove(i))
        .ok_or_else(invalid)?;
    if presented.expires_at <= now {
        user.prune_expired_tokens(now);
        repos.users.update(&user).await?;
        return Err(invalid());
    }

    // 3. Issue a fresh pair.
    let response = issue_tokens(&state, &repos, &mut user, &meta).await?;
    Ok(Json(
        ApiResponse::ok(response).with_message("Token refreshed successfully"),
    ))
}

/// GET /api/v1/auth/profile
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let repos = state.repos().await?;
    let user = find_by_id(&repos, &auth.user_id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// PUT /api/v1/auth/profile
///
/// Only `name` and `avatar` are applied; any other field in the body is
/// ignored.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let repos = state.repos().await?;
    let mut user = find_by_id(&repos, &auth.user_id).await?;

    if let Some(name) = input.name.as_deref().map(str::trim) {
        user.name = name.to_string();
    }
    if let Some(avatar) = input.avatar.as_deref().map(str::trim) {
        user.avatar = avatar.to_string();
    }
    user.updated_at = Utc::now();
    repos.users.update(&user).await?;

    Ok(Json(
        ApiResponse::ok(UserResponse::from(&user)).with_message("Profile updated successfully"),
    ))
}

/// DELETE /api/v1/auth/profile
///
/// Removes the user with their favorites and reactions, and withdraws each
/// reaction from the public counters.
pub async fn delete_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repos = state.repos().await?;
    if !repos.users.delete(&auth.user_id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }

    let favorites = repos.favorites.delete_all(&auth.user_id).await?;
    let reactions = repos.reactions.delete_all(&auth.user_id).await?;
    for reaction in &reactions {
        state.reaction_mirror.remove(
            reaction.media_type.as_str(),
            &reaction.media_id,
            reaction.reaction_type,
        );
    }
    tracing::info!(
        user_id = %auth.user_id,
        favorites,
        reactions = reactions.len(),
        "Account deleted"
    );

    Ok(Json(ApiResponse::message("Account deleted successfully")))
}

/// POST /api/v1/auth/revoke-token
pub async fn revoke_token(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repos = state.repos().await?;
    let mut user = find_by_id(&repos, &auth.user_id).await?;

    let token_hash = hash_refresh_token(&input.refresh_token);
    user.refresh_tokens.retain(|t| t.token != token_hash);
    user.updated_at = Utc::now();
    repos.users.update(&user).await?;

    Ok(Json(ApiResponse::message("Token revoked successfully")))
}

/// POST /api/v1/auth/revoke-all-tokens
pub async fn revoke_all_tokens(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repos = state.repos().await?;
    let mut user = find_by_id(&repos, &auth.user_id).await?;

    user.refresh_tokens.clear();
    user.updated_at = Utc::now();
    repos.users.update(&user).await?;

    Ok(Json(ApiResponse::message("All tokens revoked successfully")))
}

/// GET /api/v1/auth/google/login
///
/// Redirect to the Google consent screen with a fresh `state`, remembered
/// in a short-lived cookie.
pub async fn google_login(State(state): State<AppState>) -> AppResult<Response> {
    let google = state.google()?;
    let csrf_state = oauth_state();

    let cookie = format!(
        "{OAUTH_STATE_COOKIE}={csrf_state}; Max-Age={OAUTH_STATE_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Lax{}",
        if state.config.is_production() { "; Secure" } else { "" }
    );

    let mut response = redirect(&google.authorize_url(&csrf_state));
    append_header(&mut response, SET_COOKIE, &cookie);
    Ok(response)
}

/// GET /api/v1/auth/google/callback
///
/// Check `state`, exchange the code, then find, link or create the user.
/// Answers with JSON when asked to (or when no frontend is configured),
/// otherwise redirects to the frontend with the tokens.
pub async fn google_callback(
    State(state): State<AppState>,
    meta: RequestMeta,
    headers: HeaderMap,
    Query(params): Query<GoogleCallbackParams>,
) -> Response {
    let wants_json = params.response.as_deref() == Some("json")
        || headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
    let frontend = state
        .config
        .frontend_url
        .clone()
        .filter(|_| !wants_json)
        .map(|url| url.trim_end_matches('/').to_string());

    let expected = cookie_value(&headers, OAUTH_STATE_COOKIE);
    let state_ok = matches!(
        (expected.as_deref(), params.state.as_deref()),
        (Some(expected), Some(given)) if !expected.is_empty() && expected == given
    );

    let result = if !state_ok {
        Err(("invalid_state", AppError::BadRequest("invalid oauth state".into())))
    } else {
        complete_google_sign_in(&state, &params, &meta)
            .await
            .map_err(|e| ("auth_failed", e))
    };

    let mut response = match (result, frontend) {
        (Ok(auth), Some(frontend)) => redirect(&format!(
            "{frontend}/auth/callback?provider=google&token={}&refreshToken={}",
            urlencoding::encode(&auth.token),
            urlencoding::encode(&auth.refresh_token),
        )),
        (Ok(auth), None) => Json(
            ApiResponse::ok(auth).with_message("Login successful"),
        )
        .into_response(),
        (Err((code, e)), Some(frontend)) => {
            tracing::warn!(error = %e, "Google sign-in failed");
            redirect(&format!("{frontend}/login?oauth=google&error={code}"))
        }
        (Err((_, e)), None) => e.into_response(),
    };

    append_header(
        &mut response,
        SET_COOKIE,
        &format!("{OAUTH_STATE_COOKIE}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax"),
    );
    response
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

fn email_taken() -> AppError {
    AppError::Core(CoreError::Conflict("email already registered".into()))
}

async fn find_by_email(repos: &Repositories, email: &str) -> AppResult<User> {
    repos
        .users
        .find_by_email(&normalize_email(email))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

async fn find_by_id(repos: &Repositories, id: &str) -> AppResult<User> {
    repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

fn send_code(state: &AppState, email: String, code: String) {
    match &state.mailer {
        Some(mailer) => {
            mailer.queue_verification_code(&state.dispatcher, email, code);
        }
        None => tracing::warn!(to = %email, "Mail is not configured, verification code not sent"),
    }
}

/// Prune expired refresh tokens, store a new one and sign an access token.
async fn issue_tokens(
    state: &AppState,
    repos: &Repositories,
    user: &mut User,
    meta: &RequestMeta,
) -> AppResult<AuthResponse> {
    let now = Utc::now();
    let jwt = &state.config.jwt;

    let token = generate_access_token(&user.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let (refresh_token, refresh_hash) = generate_refresh_token();

    user.prune_expired_tokens(now);
    user.refresh_tokens.push(RefreshToken {
        token: refresh_hash,
        expires_at: now + Duration::days(jwt.refresh_token_expiry_days),
        created_at: now,
        user_agent: meta.user_agent.clone(),
        ip_address: meta.ip_address.clone(),
    });
    user.updated_at = now;
    repos.users.update(user).await?;

    Ok(AuthResponse {
        token,
        refresh_token,
        user: UserResponse::from(&*user),
    })
}

async fn complete_google_sign_in(
    state: &AppState,
    params: &GoogleCallbackParams,
    meta: &RequestMeta,
) -> AppResult<AuthResponse> {
    if let Some(error) = params.error.as_deref().filter(|e| !e.is_empty()) {
        return Err(AppError::BadRequest(format!("Google sign-in refused: {error}")));
    }
    let code = params
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("code is required".into()))?;

    let info = state.google()?.fetch_user(code).await?;
    if info.sub.is_empty() || info.email.is_empty() {
        return Err(AppError::Upstream("Google profile has no email".into()));
    }

    let repos = state.repos().await?;
    let mut user = upsert_google_user(&repos, &info).await?;
    issue_tokens(state, &repos, &mut user, meta).await
}

/// Find by Google id, then link by email, else create a verified account.
async fn upsert_google_user(repos: &Repositories, info: &GoogleUserInfo) -> AppResult<User> {
    let now = Utc::now();

    if let Some(user) = repos.users.find_by_google_id(&info.sub).await? {
        return Ok(user);
    }

    let email = normalize_email(&info.email);
    if let Some(mut user) = repos.users.find_by_email(&email).await? {
        user.google_id = Some(info.sub.clone());
        user.verified = true;
        if user.avatar.is_empty() {
            user.avatar = info.picture.clone();
        }
        user.updated_at = now;
        repos.users.update(&user).await?;
        tracing::info!(user_id = %user.id, "Linked Google account");
        return Ok(user);
    }

    let mut user = User::new_local(&email, String::new(), &info.name, now);
    user.provider = PROVIDER_GOOGLE.to_string();
    user.google_id = Some(info.sub.clone());
    user.verified = true;
    user.avatar = info.picture.clone();
    repos.users.create(&user).await?;
    tracing::info!(user_id = %user.id, "Created Google account");
    Ok(user)
}

/// Value of one cookie from the `Cookie` header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn redirect(location: &str) -> Response {
    let mut response = StatusCode::FOUND.into_response();
    append_header(&mut response, LOCATION, location);
    response
}

fn append_header(response: &mut Response, name: axum::http::HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            response.headers_mut().append(name, value);
        }
        Err(e) => tracing::error!(error = %e, "Invalid response header value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("a=1; oauth_state=abc123; b=2"));
        assert_eq!(cookie_value(&headers, "oauth_state").as_deref(), Some("abc123"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn redirect_sets_location() {
        let response = redirect("https://example.com/x?y=1");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "https://example.com/x?y=1");
    }
}

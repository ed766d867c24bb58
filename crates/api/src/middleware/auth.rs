//! JWT-based authentication extractor for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, USER_AGENT};
use axum::http::request::Parts;
use neomovies_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's document id (from the `unified_id` claim or its aliases).
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Authorization header required"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized("Bearer token required"))?;

        let claims =
            validate_token(token, &state.config.jwt).map_err(|_| unauthorized("Invalid token"))?;

        let user_id = claims
            .subject()
            .ok_or_else(|| unauthorized("Invalid user ID in token"))?
            .to_string();

        Ok(AuthUser { user_id })
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// Client details stored alongside a refresh token.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub user_agent: String,
    pub ip_address: String,
}

impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        let user_agent = header(USER_AGENT.as_str());
        // First hop of X-Forwarded-For, then X-Real-IP.
        let forwarded = header("x-forwarded-for");
        let ip_address = forwarded
            .split(',')
            .next()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| header("x-real-ip"));

        Ok(RequestMeta {
            user_agent,
            ip_address,
        })
    }
}

use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use neomovies_core::error::CoreError;
use neomovies_core::source::Source;
use neomovies_db::DbError;
use neomovies_providers::ProviderError;
use serde_json::json;

use crate::response::Metadata;

/// Generic text for failures whose details stay in the logs.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps the error enums of the library crates and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce the legacy
/// `{ "success": false, "error": ... }` envelope; unified endpoints wrap it
/// in [`UnifiedError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `neomovies_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error, including a cached initialization failure.
    #[error(transparent)]
    Db(#[from] DbError),

    /// An upstream client error.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource with a human-readable message.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An upstream failure the handler already phrased for the client.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// An internal error; the message is logged, never rendered.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status and client-facing message.
    pub fn classify(&self) -> (StatusCode, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                CoreError::Misconfigured(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, core.to_string())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
                }
            },

            // --- Persistence ---
            AppError::Db(err) => classify_db_error(err),

            // --- Upstreams ---
            AppError::Provider(err) => classify_provider_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();
        let body = json!({
            "success": false,
            "error": message,
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Classify a persistence error.
///
/// - Duplicate keys map to 409.
/// - A cached initialization failure maps to 500 with its text.
/// - Everything else maps to 500 with a sanitized message.
fn classify_db_error(err: &DbError) -> (StatusCode, String) {
    match err {
        DbError::Duplicate { .. } => (StatusCode::CONFLICT, err.to_string()),
        DbError::Init(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        other => {
            tracing::error!(error = %other, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
        }
    }
}

/// Classify an upstream client error.
///
/// Non-2xx answers and undecodable bodies surface as 502 with the short
/// `"<Provider> API error: <status>"` text; transport failures as 502 with
/// a fixed message. Upstream bodies are never echoed.
fn classify_provider_error(err: &ProviderError) -> (StatusCode, String) {
    match err {
        ProviderError::Api { body, .. } => {
            tracing::warn!(error = %err, body = %body, "Upstream returned an error");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        ProviderError::Decode { .. } => {
            tracing::warn!(error = %err, "Upstream response did not decode");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        ProviderError::Request(e) => {
            tracing::warn!(error = %e, "Upstream request failed");
            (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string())
        }
        ProviderError::NotConfigured(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        ProviderError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        ProviderError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
    }
}

// ---------------------------------------------------------------------------
// Unified envelope errors
// ---------------------------------------------------------------------------

/// An [`AppError`] rendered in the unified envelope:
/// `{ success: false, error, source?, metadata }`.
#[derive(Debug)]
pub struct UnifiedError {
    pub error: AppError,
    /// Catalog the request was routed to, when routing got that far.
    pub source: Option<Source>,
    pub started: Instant,
    pub query: Option<String>,
}

/// Return type of handlers that answer in the unified envelope.
pub type UnifiedResult<T> = Result<axum::Json<T>, UnifiedError>;

impl UnifiedError {
    pub fn new(error: impl Into<AppError>, source: Option<Source>, started: Instant) -> Self {
        Self {
            error: error.into(),
            source,
            started,
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl IntoResponse for UnifiedError {
    fn into_response(self) -> Response {
        let (status, message) = self.error.classify();
        let mut body = json!({
            "success": false,
            "error": message,
            "metadata": Metadata::since(self.started, self.query),
        });
        if let Some(source) = self.source {
            body["source"] = json!(source);
        }
        (status, axum::Json(body)).into_response()
    }
}

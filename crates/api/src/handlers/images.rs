//! Image proxy: `/images/{size}/{*path}`.
//!
//! Upstream images are streamed through with a long cache lifetime. Any
//! failure before the body starts turns into a placeholder, so this
//! endpoint never answers with an error status.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use neomovies_core::images::{
    resolve_upstream_url, ImageSize, CACHE_CONTROL_IMAGE, CACHE_CONTROL_PLACEHOLDER,
    PLACEHOLDER_PATH, SVG_PLACEHOLDER,
};

use crate::state::AppState;

/// GET /api/v1/images/{size}/{*path}
pub async fn proxy(
    State(state): State<AppState>,
    Path((size, path)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if path.trim_start_matches('/') == PLACEHOLDER_PATH {
        return placeholder(&state).await;
    }

    let size = ImageSize::parse(size.trim());
    let url = resolve_upstream_url(size, &path, &state.config.upstreams.tmdb_image_base_url);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    match state.images.fetch(&url, user_agent).await {
        Ok(image) => {
            let mut response = (
                [
                    (header::CONTENT_TYPE, image.content_type),
                    (header::CACHE_CONTROL, CACHE_CONTROL_IMAGE.to_string()),
                ],
                Body::from_stream(image.response.bytes_stream()),
            )
                .into_response();
            if let Some(len) = image.content_length {
                response.headers_mut().insert(header::CONTENT_LENGTH, len.into());
            }
            response
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Serving image placeholder");
            placeholder(&state).await
        }
    }
}

/// First readable placeholder file, else the inline SVG.
async fn placeholder(state: &AppState) -> Response {
    for file in &state.config.placeholder_files {
        match tokio::fs::read(file).await {
            Ok(bytes) if !bytes.is_empty() => {
                return (
                    [
                        (header::CONTENT_TYPE, "image/jpeg"),
                        (header::CACHE_CONTROL, CACHE_CONTROL_PLACEHOLDER),
                    ],
                    bytes,
                )
                    .into_response();
            }
            _ => continue,
        }
    }

    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, CACHE_CONTROL_PLACEHOLDER),
        ],
        SVG_PLACEHOLDER,
    )
        .into_response()
}

//! Errors shared by every upstream client, plus the response helpers that
//! turn a raw [`reqwest::Response`] into one of them.

use std::time::Duration;

use serde::de::DeserializeOwned;

/// Longest slice of an upstream error body kept for logs.
const BODY_SNIPPET_LEN: usize = 200;

/// Errors from the upstream client layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream answered with a non-2xx status.
    #[error("{provider} API error: {status}")]
    Api {
        provider: &'static str,
        status: u16,
        /// First few hundred bytes of the body, for logs only.
        body: String,
    },

    /// The body did not match the expected shape.
    #[error("Failed to decode {provider} response: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    /// A credential or base URL this call needs is not set.
    #[error("Server misconfiguration: {0} missing")]
    NotConfigured(&'static str),

    /// The upstream answered but had nothing for the requested id.
    #[error("{0}")]
    NotFound(String),

    /// The caller passed arguments the upstream cannot serve.
    #[error("{0}")]
    InvalidInput(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    /// Upstream status code, when the failure was a non-2xx answer.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ---- shared helpers ----

/// Build a pooled client with a per-provider timeout.
pub(crate) fn build_client(timeout: Duration) -> ProviderResult<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()?)
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`ProviderError::Api`] with the status and a
/// body snippet on failure.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> ProviderResult<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        tracing::debug!(provider, status = status.as_u16(), "Upstream returned error status");
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            body: snippet(&body),
        });
    }
    Ok(response)
}

/// Read a successful body as raw bytes.
pub(crate) async fn read_bytes(
    provider: &'static str,
    response: reqwest::Response,
) -> ProviderResult<Vec<u8>> {
    let response = ensure_success(provider, response).await?;
    Ok(response.bytes().await?.to_vec())
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_json<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> ProviderResult<T> {
    let bytes = read_bytes(provider, response).await?;
    decode(provider, &bytes)
}

pub(crate) fn decode<T: DeserializeOwned>(provider: &'static str, bytes: &[u8]) -> ProviderResult<T> {
    serde_json::from_slice(bytes).map_err(|e| ProviderError::Decode {
        provider,
        message: e.to_string(),
    })
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_message_names_provider_and_status() {
        let err = ProviderError::Api {
            provider: "TMDB",
            status: 404,
            body: "{}".into(),
        };
        assert_eq!(err.to_string(), "TMDB API error: 404");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn not_configured_names_variable() {
        assert_eq!(
            ProviderError::NotConfigured("ALLOHA_TOKEN").to_string(),
            "Server misconfiguration: ALLOHA_TOKEN missing"
        );
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let long = "я".repeat(300);
        let cut = snippet(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), BODY_SNIPPET_LEN + 3);
        assert_eq!(snippet("short"), "short");
    }
}

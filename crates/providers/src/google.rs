//! Google OAuth 2.0 authorization-code flow.

use std::time::Duration;

use neomovies_core::flexible::flexible_string;
use serde::Deserialize;

use crate::error::{build_client, parse_json, ProviderResult};

const PROVIDER: &str = "Google";

pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

const SCOPES: &str = "openid email profile";

/// OAuth client credentials.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Profile returned by the userinfo endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleUserInfo {
    #[serde(default, deserialize_with = "flexible_string")]
    pub sub: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub email: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub picture: String,
    #[serde(default)]
    pub email_verified: bool,
}

pub struct GoogleOAuthClient {
    client: reqwest::Client,
    config: GoogleOAuthConfig,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(config: GoogleOAuthConfig) -> ProviderResult<Self> {
        Ok(Self::with_endpoints(
            build_client(Self::TIMEOUT)?,
            config,
            AUTH_URL.to_string(),
            TOKEN_URL.to_string(),
            USERINFO_URL.to_string(),
        ))
    }

    /// Point the flow at non-default endpoints.
    pub fn with_endpoints(
        client: reqwest::Client,
        config: GoogleOAuthConfig,
        auth_url: String,
        token_url: String,
        userinfo_url: String,
    ) -> Self {
        Self {
            client,
            config,
            auth_url,
            token_url,
            userinfo_url,
        }
    }

    /// Consent-screen URL carrying `state`, requesting offline access.
    pub fn authorize_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("access_type", "offline"),
            ("state", state),
        ];
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.auth_url)
    }

    /// Exchange an authorization code and load the user's profile.
    pub async fn fetch_user(&self, code: &str) -> ProviderResult<GoogleUserInfo> {
        let access_token = self.exchange_code(code).await?;
        self.user_info(&access_token).await
    }

    // ---- private helpers ----

    async fn exchange_code(&self, code: &str) -> ProviderResult<String> {
        let response = self
            .client
            .post(&self.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let token: TokenResponse = parse_json(PROVIDER, response).await?;
        Ok(token.access_token)
    }

    async fn user_info(&self, access_token: &str) -> ProviderResult<GoogleUserInfo> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        parse_json(PROVIDER, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_upstream;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Form, Json, Router};
    use std::collections::HashMap;

    fn config() -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            redirect_url: "http://localhost:3000/api/v1/auth/google/callback".into(),
        }
    }

    #[test]
    fn authorize_url_carries_state_scopes_and_offline_access() {
        let client = GoogleOAuthClient::new(config()).unwrap();
        let url = client.authorize_url("xyz");
        assert!(url.starts_with(AUTH_URL));
        assert!(url.contains("client_id=cid"));
        assert!(url.contains("state=xyz"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fapi%2Fv1%2Fauth%2Fgoogle%2Fcallback"
        ));
    }

    #[tokio::test]
    async fn exchanges_code_then_reads_profile() {
        let app = Router::new()
            .route(
                "/token",
                post(|Form(form): Form<HashMap<String, String>>| async move {
                    if form.get("code").map(String::as_str) != Some("good-code")
                        || form.get("grant_type").map(String::as_str) != Some("authorization_code")
                    {
                        return Err(StatusCode::BAD_REQUEST);
                    }
                    Ok(Json(serde_json::json!({"access_token": "at-1", "token_type": "Bearer"})))
                }),
            )
            .route(
                "/userinfo",
                get(|headers: HeaderMap| async move {
                    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer at-1") {
                        return Err(StatusCode::UNAUTHORIZED);
                    }
                    Ok(Json(serde_json::json!({
                        "sub": "1234", "email": "neo@example.com", "name": "Neo",
                        "picture": "https://lh3.example/p.jpg", "email_verified": true
                    })))
                }),
            );
        let base = spawn_upstream(app).await;
        let client = GoogleOAuthClient::with_endpoints(
            reqwest::Client::new(),
            config(),
            format!("{base}/auth"),
            format!("{base}/token"),
            format!("{base}/userinfo"),
        );

        let user = client.fetch_user("good-code").await.unwrap();
        assert_eq!(user.sub, "1234");
        assert_eq!(user.email, "neo@example.com");

        let err = client.fetch_user("bad-code").await.unwrap_err();
        assert_eq!(err.to_string(), "Google API error: 400");
    }
}

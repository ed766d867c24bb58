//! JWT access-token generation/validation and refresh-token helpers.
//!
//! Access tokens are HS256-signed JWTs carrying a [`Claims`] payload.
//! Refresh tokens are opaque UUID strings; only their SHA-256 hash is
//! stored on the user document.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// JWT claims embedded in every access token.
///
/// Tokens are issued with `unified_id`. Tokens minted by older clients
/// may carry the user id as `UnifiedID` or `user_id` instead; use
/// [`Claims::subject`] to read whichever is set.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unified_id: String,
    #[serde(rename = "UnifiedID", default, skip_serializing)]
    pub legacy_unified_id: String,
    #[serde(default, skip_serializing)]
    pub user_id: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    #[serde(default)]
    pub jti: String,
}

impl Claims {
    /// First non-empty of `unified_id`, `UnifiedID`, `user_id`.
    pub fn subject(&self) -> Option<&str> {
        [&self.unified_id, &self.legacy_unified_id, &self.user_id]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in days (default: 7).
    pub access_token_expiry_days: i64,
    /// Refresh token lifetime in days (default: 30).
    pub refresh_token_expiry_days: i64,
}

/// Secret used when `JWT_SECRET` is unset. Fine for local runs only.
const DEFAULT_SECRET: &str = "your-secret-key";
/// Default access token expiry in days.
const DEFAULT_ACCESS_EXPIRY_DAYS: i64 = 7;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 30;

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            access_token_expiry_days: DEFAULT_ACCESS_EXPIRY_DAYS,
            refresh_token_expiry_days: DEFAULT_REFRESH_EXPIRY_DAYS,
        }
    }
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Default           |
    /// |----------------------------|-------------------|
    /// | `JWT_SECRET`               | `your-secret-key` |
    /// | `JWT_ACCESS_EXPIRY_DAYS`   | `7`               |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | `30`              |
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => {
                tracing::warn!("JWT_SECRET is not set, using the development default");
                DEFAULT_SECRET.to_string()
            }
        };

        let access_token_expiry_days: i64 = std::env::var("JWT_ACCESS_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_DAYS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_days,
            refresh_token_expiry_days,
        }
    }
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user_id: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_days * 24 * 60 * 60;

    let claims = Claims {
        unified_id: user_id.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
        ..Default::default()
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Generate a refresh token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext goes to the
/// client; only the hash is persisted.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a refresh token.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

//! User document, refresh tokens and DTOs.

use mongodb::bson::serde_helpers::hex_string_as_object_id;
use neomovies_core::types::Timestamp;
use serde::{Deserialize, Serialize};

use super::bson_date;

/// Sign-in method that created the account.
pub const PROVIDER_LOCAL: &str = "local";
pub const PROVIDER_GOOGLE: &str = "google";

/// Full user document from the `users` collection.
///
/// `_id` is stored as an ObjectId and dates as BSON `Date`; in Rust the id
/// is its 24-character hex form.
///
/// Contains the password hash; never serialize this to API responses.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", with = "hex_string_as_object_id")]
    pub id: String,
    pub email: String,
    /// bcrypt hash; empty for OAuth-only accounts.
    #[serde(rename = "password", default)]
    pub password_hash: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub admin_verified: bool,
    #[serde(default)]
    pub verification_code: Option<String>,
    #[serde(default, with = "bson_date::optional")]
    pub verification_expires: Option<Timestamp>,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub refresh_tokens: Vec<RefreshToken>,
    #[serde(with = "bson_date")]
    pub created_at: Timestamp,
    #[serde(with = "bson_date")]
    pub updated_at: Timestamp,
}

fn default_provider() -> String {
    PROVIDER_LOCAL.to_string()
}

impl User {
    /// New unverified local account.
    pub fn new_local(email: &str, password_hash: String, name: &str, now: Timestamp) -> Self {
        Self {
            id: super::new_id(),
            email: email.to_string(),
            password_hash,
            name: name.to_string(),
            avatar: String::new(),
            verified: false,
            is_admin: false,
            admin_verified: false,
            verification_code: None,
            verification_expires: None,
            provider: PROVIDER_LOCAL.to_string(),
            google_id: None,
            refresh_tokens: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `code` matches the pending verification code and has not
    /// expired at `now`.
    pub fn verification_code_matches(&self, code: &str, now: Timestamp) -> bool {
        match (&self.verification_code, self.verification_expires) {
            (Some(expected), Some(expires)) => expected == code.trim() && now < expires,
            _ => false,
        }
    }

    /// Drop refresh tokens that expired before `now`.
    pub fn prune_expired_tokens(&mut self, now: Timestamp) {
        self.refresh_tokens.retain(|t| t.expires_at > now);
    }
}

/// Refresh token stored on the user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshToken {
    pub token: String,
    #[serde(with = "bson_date")]
    pub expires_at: Timestamp,
    #[serde(with = "bson_date")]
    pub created_at: Timestamp,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub ip_address: String,
}

/// Safe user representation for API responses (no password hash, codes
/// or tokens).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: String,
    pub verified: bool,
    pub is_admin: bool,
    pub admin_verified: bool,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            verified: user.verified,
            is_admin: user.is_admin,
            admin_verified: user.admin_verified,
            provider: user.provider.clone(),
            google_id: user.google_id.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Profile patch. Fields that identify or secure the account are not
/// accepted here.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

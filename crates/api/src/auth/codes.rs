//! One-time values: email verification codes and OAuth `state`.

use rand::Rng;
use uuid::Uuid;

/// How long a verification code stays valid, in minutes.
pub const VERIFICATION_CODE_TTL_MINS: i64 = 10;

/// Lifetime of the `oauth_state` cookie, in seconds.
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 600;

/// Six-digit numeric code in `100000..=999999`.
pub fn verification_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

/// Unguessable OAuth `state` value.
pub fn oauth_state() -> String {
    Uuid::new_v4().simple().to_string()
}

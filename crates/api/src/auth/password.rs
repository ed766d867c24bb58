//! bcrypt password hashing, verification, and strength validation.
//!
//! Hashes are stored in modular crypt format (`$2b$10$...`), so the cost
//! and salt travel with the hash itself. Hashes written with the `$2a$`
//! and `$2y$` prefixes verify the same way.

/// bcrypt work factor for new hashes.
pub const BCRYPT_COST: u32 = 10;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash a plaintext password with a random salt.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, BCRYPT_COST)
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(false)` on mismatch. An empty stored hash (OAuth-only
/// account) never matches. A stored value that is not a bcrypt hash is an
/// error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    if hash.is_empty() {
        return Ok(false);
    }
    bcrypt::verify(password, hash)
}

/// Check the minimum length, counted in characters.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("matrix-reloaded").expect("hashing should succeed");
        assert!(hash.starts_with("$2b$10$"), "expected bcrypt prefix with cost 10");

        let verified = verify_password("matrix-reloaded", &hash).expect("verify should succeed");
        assert!(verified);
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        let verified = verify_password("wrong-password", &hash).expect("verify should succeed");
        assert!(!verified);
    }

    #[test]
    fn test_verifies_existing_2a_hash() {
        let stored = bcrypt::hash_with_result("password", BCRYPT_COST)
            .unwrap()
            .format_for_version(bcrypt::Version::TwoA);
        assert!(stored.starts_with("$2a$10$"));
        assert!(verify_password("password", &stored).unwrap());
        assert!(!verify_password("Password", &stored).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("password", "$argon2id$v=19$not-bcrypt").is_err());
    }

    #[test]
    fn test_oauth_account_has_no_password() {
        assert!(!verify_password("anything", "").unwrap());
    }

    #[test]
    fn test_password_length_boundary() {
        let err = validate_password_strength("12345", MIN_PASSWORD_LENGTH).unwrap_err();
        assert!(err.contains("at least 6 characters"));
        assert!(validate_password_strength("123456", MIN_PASSWORD_LENGTH).is_ok());
        // Cyrillic counts per character, not per byte.
        assert!(validate_password_strength("пароль", MIN_PASSWORD_LENGTH).is_ok());
        assert!(validate_password_strength("парол", MIN_PASSWORD_LENGTH).is_err());
    }
}

// Password hashing and verification

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::warn;

use crate::auth::error::AuthError;

/// Well-formed Argon2id hash that matches no password. Verifying against it
/// costs the same as a real verification.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// One-way, salted password hashing
pub trait PasswordHasher: Send + Sync {
    /// Hash a password with a fresh random salt
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a password against a stored hash.
    /// A malformed stored hash never matches.
    fn verify(&self, password: &str, hash: &str) -> bool;

    /// Burn the same CPU as a real verification without a stored hash.
    fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, DUMMY_HASH);
    }
}

/// Argon2id with the crate's default cost parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordService;

impl PasswordService {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stored password hash is malformed: {}", e);
                return false;
            }
        };

        // argon2 compares the derived output in constant time
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = PasswordService::new();
        let hash = hasher.hash("pw123456").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pw123456", &hash));
        assert!(!hasher.verify("pw1234567", &hash));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let hasher = PasswordService::new();
        let first = hasher.hash("pw123456").unwrap();
        let second = hasher.hash("pw123456").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("pw123456", &first));
        assert!(hasher.verify("pw123456", &second));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let hasher = PasswordService::new();

        assert!(!hasher.verify("pw123456", ""));
        assert!(!hasher.verify("pw123456", "plaintext-password"));
        assert!(!hasher.verify("pw123456", "$argon2id$v=19$garbage"));
    }

    #[test]
    fn test_dummy_hash_is_well_formed_and_matches_nothing() {
        assert!(PasswordHash::new(DUMMY_HASH).is_ok());

        let hasher = PasswordService::new();
        assert!(!hasher.verify("", DUMMY_HASH));
        assert!(!hasher.verify("pw123456", DUMMY_HASH));
    }
}

//! Argon2id password hashing.
//!
//! Credentials are hashed into PHC strings at registration and verified at
//! login. The raw password never leaves the request scope.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};

/// Errors raised while hashing a candidate password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// The candidate password was empty.
    #[error("password must not be empty")]
    Empty,
    /// The hashing backend rejected the input.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

/// Argon2id hash of an account password in PHC string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a candidate password with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordError::Hashing {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Rehydrate a hash from its stored PHC string.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check a candidate password against this hash.
    ///
    /// A malformed stored hash verifies as false rather than erroring so a
    /// corrupted row cannot be used to log in.
    pub fn verify(&self, password: &str) -> bool {
        argon2::password_hash::PasswordHash::new(&self.0)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Stored PHC string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips_with_verify() {
        let hash = PasswordHash::hash("testpass123").expect("hash");
        assert!(hash.verify("testpass123"));
        assert!(!hash.verify("wrongpass"));
    }

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(PasswordHash::hash("").expect_err("rejected"), PasswordError::Empty);
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        let hash = PasswordHash::from_stored("not-a-phc-string");
        assert!(!hash.verify("anything"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = PasswordHash::hash("samepass").expect("hash");
        let b = PasswordHash::hash("samepass").expect("hash");
        assert_ne!(a.as_str(), b.as_str());
    }
}

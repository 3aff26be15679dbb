//! Password hashing and random token helpers.

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as _, SaltString};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::AuthError;

/// Length of generated password reset tokens.
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Salted, adaptive password hashing.
///
/// `compare` is the credential check used by login and password change. It must
/// never fall back to comparing raw strings.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into a PHC string.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHashError` if hashing fails.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Compares a submitted password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHashError` if the stored hash cannot be parsed.
    fn compare(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError>;
}

/// Argon2id hasher.
///
/// ```rust
/// use portfolio_auth::crypto::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::default();
/// let hash = hasher.hash("correct horse").unwrap();
/// assert!(hasher.compare("correct horse", &hash).unwrap());
/// assert!(!hasher.compare("battery staple", &hash).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    /// Memory cost in KiB
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Hasher {
    #[must_use]
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// 64 MiB, 3 iterations, 4 lanes.
    #[must_use]
    pub fn production() -> Self {
        Self::new(65536, 3, 4)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| AuthError::PasswordHashError)?;

        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    fn compare(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::PasswordHashError)?;

        // params come from the PHC string, not from self
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Generates an alphanumeric token from the OS random source.
pub fn generate_token(length: usize) -> String {
    OsRng
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// SHA-256 hex digest of a token. Reset tokens are stored only in this form.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_compare() {
        let hasher = Argon2Hasher::default();
        let hash = hasher.hash("portfolio-pass").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.compare("portfolio-pass", &hash).unwrap());
        assert!(!hasher.compare("portfolio-pass ", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let hasher = Argon2Hasher::default();
        let first = hasher.hash("portfolio-pass").unwrap();
        let second = hasher.hash("portfolio-pass").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_compare_rejects_plaintext_stored_value() {
        let hasher = Argon2Hasher::default();
        let result = hasher.compare("portfolio-pass", "portfolio-pass");
        assert_eq!(result.unwrap_err(), AuthError::PasswordHashError);
    }

    #[test]
    fn test_generate_token() {
        let token = generate_token(DEFAULT_TOKEN_LENGTH);
        assert_eq!(token.len(), DEFAULT_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token(DEFAULT_TOKEN_LENGTH));
    }

    #[test]
    fn test_hash_token_matches_known_digest() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_token("reset-me").len(), 64);
    }
}

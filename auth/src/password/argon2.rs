use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// One-way credential hashing with Argon2id.
///
/// Each digest embeds its own random salt and parameters in PHC string form,
/// so hashing the same plaintext twice yields two different digests that both
/// verify.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password.
    ///
    /// No length rules are applied here; callers validate input first.
    ///
    /// # Errors
    /// * `HashingFailed` - The salt could not be generated or hashing failed.
    ///   This only happens when the entropy source is unavailable.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext attempt against a stored digest.
    ///
    /// Returns `false` for a wrong password, for a digest that is not a valid
    /// PHC string, and for digests produced by another scheme.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

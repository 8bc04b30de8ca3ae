use crate::jwt::AuthError;
use crate::jwt::JwtError;
use crate::jwt::TokenService;
use crate::jwt::VerifiedIdentity;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::role::Role;

/// Authentication coordinator combining password verification and token issuance.
///
/// Shared process-wide (behind an `Arc`) by the login flow, which issues
/// tokens, and by the request gate, which verifies them.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `ttl_hours` - Lifetime of issued tokens
    pub fn new(jwt_secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_service: TokenService::new(jwt_secret, ttl_hours),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for the subject.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match the stored hash
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject_id: &str,
        role: Role,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_service.issue(subject_id, role)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// Used once the caller has already established the subject's identity.
    pub fn generate_token(&self, subject_id: &str, role: Role) -> Result<String, JwtError> {
        self.token_service.issue(subject_id, role)
    }

    /// Validate a token and return the identity it carries.
    ///
    /// # Errors
    /// * `AuthError` - Token is missing, malformed, or expired
    pub fn validate_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.token_service.verify(token)
    }

    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(SECRET, 24);

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &hash, "user123", Role::Staff)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let identity = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(identity.subject_id, "user123");
        assert_eq!(identity.role, Role::Staff);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(SECRET, 24);

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash, "user123", Role::Staff);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_corrupt_stored_hash() {
        let authenticator = Authenticator::new(SECRET, 24);

        let result = authenticator.authenticate("my_password", "not-a-hash", "user123", Role::Admin);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_generate_and_validate_token() {
        let authenticator = Authenticator::new(SECRET, 24);

        let token = authenticator
            .generate_token("user123", Role::Admin)
            .expect("Failed to generate token");

        let identity = authenticator
            .validate_token(&token)
            .expect("Failed to validate token");
        assert_eq!(identity.subject_id, "user123");
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = Authenticator::new(SECRET, 24);

        let result = authenticator.validate_token("invalid.token.here");
        assert_eq!(result, Err(AuthError::Malformed));
    }
}

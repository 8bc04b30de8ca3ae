use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::AuthError;
use super::errors::JwtError;
use crate::role::Role;

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject_id: String,
    pub role: Role,
}

/// Issues and verifies signed, time-limited access tokens.
///
/// Uses HS256 with a symmetric secret. Secret and lifetime are fixed at
/// construction from process-wide configuration. Verification is stateless:
/// there is no session table and no revocation, so rotating the secret is the
/// only way to invalidate outstanding tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl_hours: i64,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - Signing secret (at least 32 bytes recommended for HS256)
    /// * `ttl_hours` - Lifetime of issued tokens
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl_hours,
        }
    }

    /// Issue a token for `subject_id` with `role`, starting now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject_id: &str, role: Role) -> Result<String, JwtError> {
        self.issue_at(subject_id, role, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        subject_id: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_subject(subject_id, role, issued_at, self.ttl_hours);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// * `Missing` - Token is empty
    /// * `Malformed` - Token cannot be parsed, has a bad signature, or bad claims
    /// * `Expired` - Signature is valid but `exp` has been reached
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedIdentity, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Missing);
        }

        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against `now` with no leeway
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::Malformed)?;
        let claims = token_data.claims;

        if claims.sub.is_empty() {
            return Err(AuthError::Malformed);
        }

        if claims.is_expired(now.timestamp()) {
            return Err(AuthError::Expired);
        }

        Ok(VerifiedIdentity {
            subject_id: claims.sub,
            role: claims.role,
        })
    }
}

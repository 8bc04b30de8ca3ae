use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::role::Role;

/// Access token payload.
///
/// Carries the subject identifier and role alongside the standard RFC 7519
/// issued-at and expiration timestamps (Unix seconds).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Role at issuance
    pub role: Role,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Build claims for a subject, expiring `ttl_hours` after `issued_at`.
    pub fn for_subject(
        subject: impl ToString,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl_hours: i64,
    ) -> Self {
        let expiration = issued_at + Duration::hours(ttl_hours);

        Self {
            sub: subject.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// A token is expired from the second its `exp` is reached.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

use std::sync::Arc;

use auth::AuthError;
use auth::Authenticator;
use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::account::models::AccountId;
use crate::domain::account::models::Actor;

/// Endpoints reserved for administrators.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Extension type to store the verified caller in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub role: Role,
}

impl AuthenticatedAccount {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.account_id,
            role: self.role,
        }
    }
}

/// Middleware that validates bearer tokens and adds the caller to request
/// extensions. Rejects with 401 before any handler runs.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let identity = bearer_token(req.headers())
        .and_then(|token| authenticator.validate_token(token))
        .map_err(|e| {
            tracing::warn!(reason = %e, uri = %req.uri(), "Rejected unauthenticated request");
            unauthorized(e)
        })?;

    let account_id = AccountId::from_string(&identity.subject_id).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not an account id");
        unauthorized(AuthError::Malformed)
    })?;

    req.extensions_mut().insert(AuthenticatedAccount {
        account_id,
        role: identity.role,
    });

    Ok(next.run(req).await)
}

/// Middleware that admits only callers whose token role is in `allowed`.
///
/// Must run after [`authenticate`]; a request without a verified caller is
/// rejected.
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let caller = req
        .extensions()
        .get::<AuthenticatedAccount>()
        .copied()
        .ok_or_else(|| {
            tracing::error!(uri = %req.uri(), "Role gate reached without an authenticated caller");
            unauthorized(AuthError::Missing)
        })?;

    if !allowed.contains(&caller.role) {
        tracing::warn!(
            account_id = %caller.account_id,
            role = %caller.role,
            uri = %req.uri(),
            "Rejected request outside allowed roles"
        );
        return Err((StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden" }))).into_response());
    }

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::Missing)?;

    // Scheme names are case-insensitive
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::Missing)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Missing);
    }
    let token = token.trim();

    if token.is_empty() {
        return Err(AuthError::Missing);
    }

    Ok(token)
}

fn unauthorized(err: AuthError) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

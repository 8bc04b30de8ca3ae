use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::non_empty;
use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountError;
use crate::domain::account::models::CreateAccountCommand;
use crate::domain::account::models::DisplayName;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Password;
use crate::domain::account::models::Username;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    let Json(body) = body?;

    state
        .directory
        .create_account(caller.actor(), body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

/// HTTP request body for creating an account (raw JSON)
///
/// Shared by self-service registration and administrative creation. The role
/// defaults to staff when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateAccountRequest {
    name: String,
    email: String,
    username: String,
    password: String,
    role: Option<String>,
    phone: Option<String>,
    department: Option<String>,
    bio: Option<String>,
}

impl CreateAccountRequest {
    pub(crate) fn try_into_command(self) -> Result<CreateAccountCommand, AccountError> {
        let role = match non_empty(self.role) {
            Some(role) => role.parse::<auth::Role>()?,
            None => auth::Role::Staff,
        };

        Ok(CreateAccountCommand {
            name: DisplayName::new(self.name)?,
            email: EmailAddress::new(self.email)?,
            username: Username::new(self.username)?,
            password: Password::new(self.password)?,
            role,
            phone: non_empty(self.phone),
            department: non_empty(self.department),
            bio: non_empty(self.bio),
        })
    }
}

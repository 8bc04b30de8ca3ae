use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::deserialize_some;
use super::non_empty;
use super::normalize_nullable;
use super::parse_account_id;
use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountError;
use crate::domain::account::models::AccountPatch;
use crate::domain::account::models::AccountStatus;
use crate::domain::account::models::DisplayName;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::SocialLinks;
use crate::domain::account::models::Username;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating an account (raw JSON)
///
/// Omitted fields are left untouched. Nullable fields are cleared by `null`
/// or an empty string.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub department: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub profile_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub social_links: Option<Option<SocialLinks>>,
    pub role: Option<String>,
    pub status: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_patch(self) -> Result<AccountPatch, AccountError> {
        // Validation happens here - errors are automatically converted via #[from]
        let name = non_empty(self.name).map(DisplayName::new).transpose()?;
        let email = non_empty(self.email).map(EmailAddress::new).transpose()?;
        let username = non_empty(self.username).map(Username::new).transpose()?;
        let role = non_empty(self.role)
            .map(|r| r.parse::<auth::Role>())
            .transpose()?;
        let status = non_empty(self.status)
            .map(|s| s.parse::<AccountStatus>())
            .transpose()?;

        Ok(AccountPatch {
            name,
            email,
            username,
            phone: normalize_nullable(self.phone),
            department: normalize_nullable(self.department),
            bio: normalize_nullable(self.bio),
            profile_image: normalize_nullable(self.profile_image),
            social_links: self
                .social_links
                .map(|links| links.filter(|l| !l.is_empty())),
            role,
            status,
        })
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    // Parse account ID and request at HTTP boundary - errors automatically converted
    let account_id = parse_account_id(&id)?;
    let Json(body) = body?;
    let patch = body.try_into_patch()?;

    state
        .directory
        .update_account(caller.actor(), &account_id, patch)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::profile::ProfilePermissions;
use crate::domain::account::profile::ProfileView;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    state
        .directory
        .get_profile(&caller.account_id)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponseData {
    #[serde(flatten)]
    pub account: AccountData,
    pub join_date: String,
    pub role_display: String,
    pub permissions: PermissionsData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionsData {
    pub can_manage_users: bool,
    pub can_manage_roles: bool,
    pub can_manage_system: bool,
    pub access_permissions: Vec<String>,
}

impl From<ProfilePermissions> for PermissionsData {
    fn from(permissions: ProfilePermissions) -> Self {
        Self {
            can_manage_users: permissions.can_manage_users,
            can_manage_roles: permissions.can_manage_roles,
            can_manage_system: permissions.can_manage_system,
            access_permissions: permissions
                .access_permissions
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl From<ProfileView> for ProfileResponseData {
    fn from(profile: ProfileView) -> Self {
        Self {
            account: (&profile.account).into(),
            join_date: profile.join_date,
            role_display: profile.role_display.to_string(),
            permissions: profile.permissions.into(),
        }
    }
}

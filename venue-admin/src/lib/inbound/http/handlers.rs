use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::SocialLinks;
use crate::domain::pagination::Page;

pub mod create_user;
pub mod delete_user;
pub mod get_profile;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod register;
pub mod update_user;

const INVALID_REQUEST_MESSAGE: &str =
    "Invalid request format. Please check your input data and try again.";
const INTERNAL_ERROR_MESSAGE: &str =
    "An error occurred while processing your request. Please try again later.";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            AccountError::AccountAlreadyExists
            | AccountError::EmailAlreadyExists(_)
            | AccountError::UsernameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AccountError::Forbidden => ApiError::Forbidden(err.to_string()),
            AccountError::InvalidCredentials
            | AccountError::InactiveAccount
            | AccountError::UnknownActor => ApiError::Unauthorized(err.to_string()),
            AccountError::InvalidAccountId(_)
            | AccountError::InvalidName(_)
            | AccountError::InvalidUsername(_)
            | AccountError::InvalidEmail(_)
            | AccountError::InvalidPassword(_)
            | AccountError::InvalidRole(_)
            | AccountError::InvalidStatus(_) => ApiError::UnprocessableEntity(err.to_string()),
            AccountError::Database(_) | AccountError::Internal(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest(INVALID_REQUEST_MESSAGE.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected query string");
        ApiError::BadRequest(INVALID_REQUEST_MESSAGE.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Parse a path segment into an account id, rejecting with 400.
pub fn parse_account_id(raw: &str) -> Result<AccountId, ApiError> {
    AccountId::from_string(raw).map_err(|_| ApiError::BadRequest("Invalid user ID".to_string()))
}

/// Public projection of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub role: auth::Role,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.as_str().to_string(),
            email: account.email.as_str().to_string(),
            username: account.username.as_str().to_string(),
            role: account.role,
            status: account.status.as_str().to_string(),
            phone: account.phone.clone(),
            department: account.department.clone(),
            bio: account.bio.clone(),
            profile_image: account.profile_image.clone(),
            social_links: account.social_links.clone(),
            last_login: account.last_login,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// List envelope shared by paginated endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedResponseData<T: Serialize + PartialEq> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T: Serialize + PartialEq> From<Page<T>> for PaginatedResponseData<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            total_pages: page.total_pages(),
            total: page.total,
            page: page.request.page(),
            limit: page.request.limit(),
            data: page.items,
        }
    }
}

/// Distinguish an absent field (`None`) from an explicit value or `null`
/// (`Some(_)`). Use with `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Treat empty or blank text as a clear request.
pub(crate) fn normalize_nullable(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(|inner| inner.filter(|s| !s.trim().is_empty()))
}

/// Empty optional text on create is the same as omitting it.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        bio: Option<Option<String>>,
    }

    #[test]
    fn test_deserialize_some_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"bio": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"bio": "Chef"}"#).unwrap();

        assert_eq!(absent.bio, None);
        assert_eq!(null.bio, Some(None));
        assert_eq!(set.bio, Some(Some("Chef".to_string())));
    }

    #[test]
    fn test_blank_text_clears() {
        assert_eq!(normalize_nullable(Some(Some("  ".to_string()))), Some(None));
        assert_eq!(normalize_nullable(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            ApiError::from(AccountError::Forbidden),
            ApiError::Forbidden("You do not have permission to perform this action".to_string())
        );
        assert!(matches!(
            ApiError::from(AccountError::AccountAlreadyExists),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(AccountError::UnknownActor),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(AccountError::Database("boom".to_string())),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response =
            ApiError::InternalServerError("pool timed out on 10.0.0.3".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_path_id_is_bad_request() {
        assert_eq!(
            parse_account_id("not-a-uuid"),
            Err(ApiError::BadRequest("Invalid user ID".to_string()))
        );
    }
}

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::non_empty;
use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use super::PaginatedResponseData;
use crate::account::errors::AccountError;
use crate::domain::account::models::AccountQuery;
use crate::domain::account::models::AccountStatus;
use crate::domain::pagination::PageRequest;
use crate::inbound::http::router::AppState;

/// Raw query parameters. Kept as strings so that unparsable paging values
/// fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

impl ListUsersParams {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(
            parse_or(self.page.as_deref(), PageRequest::DEFAULT_PAGE),
            parse_or(self.limit.as_deref(), PageRequest::DEFAULT_LIMIT),
        )
    }

    fn try_into_query(self) -> Result<AccountQuery, AccountError> {
        Ok(AccountQuery {
            search: non_empty(self.search).map(|s| s.trim().to_string()),
            role: non_empty(self.role)
                .map(|r| r.parse::<auth::Role>())
                .transpose()?,
            status: non_empty(self.status)
                .map(|s| s.parse::<AccountStatus>())
                .transpose()?,
        })
    }
}

/// Parse an integer parameter, saturating into `u32`.
fn parse_or(raw: Option<&str>, default: u32) -> u32 {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<i64>()
            .map(|v| v.clamp(0, i64::from(u32::MAX)) as u32)
            .unwrap_or(default),
        None => default,
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    params: Result<Query<ListUsersParams>, QueryRejection>,
) -> Result<ApiSuccess<PaginatedResponseData<AccountData>>, ApiError> {
    let Query(params) = params?;
    let page = params.page_request();
    let query = params.try_into_query()?;

    state
        .directory
        .list_accounts(query, page)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            let page = page.map(|ref account| AccountData::from(account));
            ApiSuccess::new(StatusCode::OK, page.into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = ListUsersParams::default().page_request();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let params = ListUsersParams {
            page: Some("two".to_string()),
            limit: Some("".to_string()),
            ..ListUsersParams::default()
        };
        let request = params.page_request();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let params = ListUsersParams {
            page: Some("-4".to_string()),
            limit: Some("1000".to_string()),
            ..ListUsersParams::default()
        };
        let request = params.page_request();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 100);
    }

    #[test]
    fn test_filters() {
        let query = ListUsersParams {
            search: Some("  ali ".to_string()),
            role: Some("staff".to_string()),
            status: Some("".to_string()),
            ..ListUsersParams::default()
        }
        .try_into_query()
        .unwrap();

        assert_eq!(query.search.as_deref(), Some("ali"));
        assert_eq!(query.role, Some(auth::Role::Staff));
        assert_eq!(query.status, None);

        let invalid = ListUsersParams {
            role: Some("owner".to_string()),
            ..ListUsersParams::default()
        };
        assert!(invalid.try_into_query().is_err());
    }
}

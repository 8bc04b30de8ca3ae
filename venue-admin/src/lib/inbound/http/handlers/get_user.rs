use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::parse_account_id;
use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    let account_id = parse_account_id(&id)?;

    state
        .directory
        .get_account(&account_id)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_account_id;
use super::ApiError;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let account_id = parse_account_id(&id)?;

    state
        .directory
        .delete_account(caller.actor(), &account_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

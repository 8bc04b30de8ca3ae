use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::create_user::CreateAccountRequest;
use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    let Json(body) = body?;

    state
        .directory
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

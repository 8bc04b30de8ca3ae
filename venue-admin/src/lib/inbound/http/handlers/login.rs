use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body?;

    let outcome = state
        .directory
        .login(LoginCommand {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user: (&outcome.account).into(),
            token: outcome.token,
        },
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub user: AccountData,
}

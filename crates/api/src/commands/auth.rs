//! Login, current user and self-service password change

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use timebook_core::LoginResponse;
use timebook_domain::User;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, AuthUser};
use crate::utils::command_helpers::execute_command;

/// Login payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Password change payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// `POST /api/auth/login`
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response =
        execute_command("auth::login", ctx.auth.login(&body.username, &body.password)).await?;
    Ok(Json(response))
}

/// `GET /api/auth/me`
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// `PUT /api/auth/password`
pub async fn change_password(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    execute_command(
        "auth::change_password",
        ctx.users.change_password(&user, &body.current_password, &body.new_password),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

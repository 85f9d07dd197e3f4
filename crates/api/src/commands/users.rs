//! User administration (admin only)

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use timebook_domain::{User, UserInput};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{AdminUser, ApiJson};
use crate::utils::command_helpers::execute_command;

/// `GET /api/users`
pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(execute_command("users::list", ctx.users.list()).await?))
}

/// `GET /api/users/{id}`
pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(execute_command("users::get", ctx.users.get(&id)).await?))
}

/// `POST /api/users`
pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = execute_command("users::create", ctx.users.create(input)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /api/users/{id}`
pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<Json<User>> {
    Ok(Json(execute_command("users::update", ctx.users.update(&id, input)).await?))
}

/// `DELETE /api/users/{id}` archives the user.
pub async fn archive(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(execute_command("users::archive", ctx.users.archive(&id)).await?))
}

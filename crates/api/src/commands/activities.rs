//! Activities: readable by everyone signed in, writable by admins

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use timebook_domain::{Activity, ActivityInput};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{AdminUser, ApiJson, AuthUser};
use crate::utils::command_helpers::execute_command;

pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(_): AuthUser,
) -> ApiResult<Json<Vec<Activity>>> {
    Ok(Json(execute_command("activities::list", ctx.catalog.list_activities()).await?))
}

pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Activity>> {
    Ok(Json(execute_command("activities::get", ctx.catalog.get_activity(&id)).await?))
}

pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    ApiJson(input): ApiJson<ActivityInput>,
) -> ApiResult<(StatusCode, Json<Activity>)> {
    let activity =
        execute_command("activities::create", ctx.catalog.create_activity(input)).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ActivityInput>,
) -> ApiResult<Json<Activity>> {
    let activity =
        execute_command("activities::update", ctx.catalog.update_activity(&id, input)).await?;
    Ok(Json(activity))
}

/// Archives rather than deletes; the name becomes free for reuse.
pub async fn archive(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Activity>> {
    let activity =
        execute_command("activities::archive", ctx.catalog.archive_activity(&id)).await?;
    Ok(Json(activity))
}

//! Clients: readable by everyone signed in, writable by admins

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use timebook_domain::{Client, ClientInput};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{AdminUser, ApiJson, AuthUser};
use crate::utils::command_helpers::execute_command;

/// `GET /api/clients`
pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(_): AuthUser,
) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(execute_command("clients::list", ctx.catalog.list_clients()).await?))
}

/// `GET /api/clients/{id}`
pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    Ok(Json(execute_command("clients::get", ctx.catalog.get_client(&id)).await?))
}

/// `POST /api/clients`
pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    ApiJson(input): ApiJson<ClientInput>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = execute_command("clients::create", ctx.catalog.create_client(input)).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// `PUT /api/clients/{id}`
pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ClientInput>,
) -> ApiResult<Json<Client>> {
    Ok(Json(execute_command("clients::update", ctx.catalog.update_client(&id, input)).await?))
}

/// `DELETE /api/clients/{id}` archives the client.
pub async fn archive(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    Ok(Json(execute_command("clients::archive", ctx.catalog.archive_client(&id)).await?))
}

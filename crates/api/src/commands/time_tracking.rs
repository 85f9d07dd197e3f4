//! Time-tracking reports of the signed-in user

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use timebook_domain::{Report, ReportInput};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery, AuthUser};
use crate::utils::command_helpers::execute_command;

/// `?month=&year=&userId=`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthQuery {
    pub month: u32,
    pub year: i32,
    /// Honoured for administrators only
    #[serde(default)]
    pub user_id: Option<String>,
}

/// `GET /api/time-tracking`
pub async fn list_month(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(caller): AuthUser,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> ApiResult<Json<Vec<Report>>> {
    let reports = execute_command(
        "time_tracking::list_month",
        ctx.time_tracking.list_month(&caller, query.month, query.year, query.user_id.as_deref()),
    )
    .await?;
    Ok(Json(reports))
}

/// `POST /api/time-tracking`
pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(caller): AuthUser,
    ApiJson(input): ApiJson<ReportInput>,
) -> ApiResult<(StatusCode, Json<Report>)> {
    let report =
        execute_command("time_tracking::create", ctx.time_tracking.create(&caller, input)).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// `PUT /api/time-tracking/{id}`
pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ReportInput>,
) -> ApiResult<Json<Report>> {
    let report =
        execute_command("time_tracking::update", ctx.time_tracking.update(&caller, &id, input))
            .await?;
    Ok(Json(report))
}

/// `DELETE /api/time-tracking/{id}`
pub async fn delete(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    execute_command("time_tracking::delete", ctx.time_tracking.delete(&caller, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

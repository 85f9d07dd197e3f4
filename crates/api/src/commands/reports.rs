//! Aggregated reports and CSV export (admin only)

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use timebook_domain::{ReportOutput, ReportQuery};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::AdminUser;
use crate::query::ReportParams;
use crate::utils::command_helpers::execute_command;

/// `GET /api/reports?startDate=&endDate=&group=&filter[...]=`
pub async fn aggregate(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<ReportOutput>> {
    let output = execute_command("reports::aggregate", async {
        let params = ReportParams::parse(raw.as_deref())?;
        let query =
            ReportQuery { range: params.date_range()?, group: params.group, filter: params.filter };
        ctx.reports.aggregate(&query).await
    })
    .await?;
    Ok(Json(output))
}

/// `GET /api/reports/month?month=&year=&group=&filter[...]=`
pub async fn aggregate_month(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<ReportOutput>> {
    let output = execute_command("reports::aggregate_month", async {
        let params = ReportParams::parse(raw.as_deref())?;
        let query = ReportQuery {
            range: params.month_range()?,
            group: params.group,
            filter: params.filter,
        };
        ctx.reports.aggregate(&query).await
    })
    .await?;
    Ok(Json(output))
}

/// `GET /api/reports/export?startDate=&endDate=&filter[...]=`
///
/// `group` is accepted and ignored; rows are always in date order.
pub async fn export_csv(
    State(ctx): State<Arc<AppContext>>,
    AdminUser(_): AdminUser,
    RawQuery(raw): RawQuery,
) -> ApiResult<impl IntoResponse> {
    let csv = execute_command("reports::export_csv", async {
        let params = ReportParams::parse(raw.as_deref())?;
        ctx.reports.export_csv(params.date_range()?, &params.filter).await
    })
    .await?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"reports.csv\""),
        ],
        csv,
    ))
}

//! Liveness and database connectivity

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use timebook_infra::PoolHealth;
use tokio::task;
use tracing::warn;

use crate::context::AppContext;
use crate::utils::health::{ComponentHealth, HealthStatus};

const DATABASE_UNAVAILABLE: &str = "database unavailable";

/// `GET /health`
///
/// 200 when the database answers, 503 otherwise. Needs no credentials, so
/// failure details go to the log only.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> (StatusCode, Json<HealthStatus>) {
    let db = Arc::clone(&ctx.db);
    let database = match task::spawn_blocking(move || db.health_check()).await {
        Ok(probe) => database_component(&probe),
        Err(err) => {
            warn!(error = %err, "database health probe did not complete");
            ComponentHealth::unhealthy("database", DATABASE_UNAVAILABLE)
        }
    };

    let status = HealthStatus::new().add_component(database);
    let code = if status.is_healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(status))
}

fn database_component(probe: &PoolHealth) -> ComponentHealth {
    let component = if probe.healthy {
        ComponentHealth::healthy("database")
    } else {
        warn!(error = probe.message.as_deref().unwrap_or_default(), "database health probe failed");
        ComponentHealth::unhealthy("database", DATABASE_UNAVAILABLE)
    };

    component.with_details(json!({
        "connections": probe.connections,
        "idleConnections": probe.idle_connections,
        "maxConnections": probe.max_connections,
        "connectionsAcquired": probe.connections_acquired,
        "connectionFailures": probe.connection_failures,
        "avgConnectionTimeMs": probe.avg_connection_time_ms,
    }))
}

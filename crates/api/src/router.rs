//! Route table and middleware stack

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::commands::{activities, auth, clients, health, reports, time_tracking, users};
use crate::context::AppContext;
use crate::middleware::request_tracing_middleware;

/// Build the application router over a shared context.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/password", put(auth::change_password))
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", get(users::get).put(users::update).delete(users::archive))
        .route("/clients", get(clients::list).post(clients::create))
        .route("/clients/{id}", get(clients::get).put(clients::update).delete(clients::archive))
        .route("/activities", get(activities::list).post(activities::create))
        .route(
            "/activities/{id}",
            get(activities::get).put(activities::update).delete(activities::archive),
        )
        .route("/time-tracking", get(time_tracking::list_month).post(time_tracking::create))
        .route("/time-tracking/{id}", put(time_tracking::update).delete(time_tracking::delete))
        .route("/reports", get(reports::aggregate))
        .route("/reports/month", get(reports::aggregate_month))
        .route("/reports/export", get(reports::export_csv));

    let mut router = Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(middleware::from_fn(request_tracing_middleware));

    if let Some(cors) = cors_layer(&ctx.config.server.cors_origins) {
        router = router.layer(cors);
    }

    router.with_state(ctx)
}

/// `None` when no origins are configured; `*` allows any origin.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .max_age(Duration::from_secs(60 * 60)),
    )
}

//! Shared harness for router-level tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tempfile::TempDir;
use timebook_core::FixedClock;
use timebook_domain::{BootstrapAdmin, Config};
use timebook_server::{build_router, AppContext};
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-pass";

/// Server wired to a throwaway database.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    router: Router,
    /// Keep temporary directory alive for the lifetime of the app.
    _temp_dir: TempDir,
}

impl TestApp {
    /// Fresh app whose edit-window clock reads 2024-03-10.
    pub async fn new() -> Self {
        Self::with_today(date(2024, 3, 10)).await
    }

    pub async fn with_today(today: NaiveDate) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temporary database directory");

        let mut config = Config::default();
        config.database.path = temp_dir.path().join("timebook.db").to_string_lossy().into_owned();
        config.database.pool_size = 4;
        config.auth.jwt_secret = "router-test-secret".to_string();
        config.auth.bootstrap_admin = Some(BootstrapAdmin {
            username: ADMIN_USERNAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            email: "admin@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        });

        let ctx = Arc::new(
            AppContext::with_clock(config, Arc::new(FixedClock(today)))
                .expect("failed to build application context"),
        );
        ctx.ensure_bootstrap_admin().await.expect("failed to create bootstrap admin");

        let router = build_router(Arc::clone(&ctx));
        Self { ctx, router, _temp_dir: temp_dir }
    }

    /// Send a request and return the raw response.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.oneshot(builder.body(body).expect("failed to build request")).await
    }

    /// Send a prebuilt request.
    pub async fn oneshot(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.expect("router is infallible")
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status();
        let bytes = body_bytes(response).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };
        (status, json)
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token in login response").to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Create an entity as admin and return its id.
    pub async fn create(&self, admin: &str, path: &str, body: Value) -> String {
        let (status, created) = self.call(Method::POST, path, Some(admin), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create {path} failed: {created}");
        created["id"].as_str().expect("id in created entity").to_string()
    }

    /// Create a non-admin user and log them in.
    pub async fn worker(&self, admin: &str, username: &str, extra: Value) -> (String, String) {
        let mut body = json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "idNumber": format!("ID-{username}"),
            "firstName": "Worker",
            "lastName": username,
            "password": "worker-pass",
            "employmentType": "employee",
        });
        if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }
        let id = self.create(admin, "/api/users", body).await;
        let token = self.login(username, "worker-pass").await;
        (id, token)
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.expect("failed to read body").to_vec()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Report payload for the time-tracking endpoints.
pub fn report_body(client_id: &str, activity_id: &str, day: &str, duration: f64) -> Value {
    json!({
        "clientId": client_id,
        "activityId": activity_id,
        "date": day,
        "startTime": "08:00",
        "endTime": "16:00",
        "duration": duration,
        "notes": "on site",
    })
}

//! Request extractors: the authenticated caller and JSON/query payloads

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use timebook_domain::{TimebookError, User};

use crate::context::AppContext;
use crate::error::ApiError;

/// JSON body whose rejections render as `ApiError`
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejections render as `ApiError`
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// The caller, resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// The caller, who must be an administrator
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<Arc<AppContext>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = ctx.auth.authenticate(token).await?;
        Ok(Self(user))
    }
}

impl FromRequestParts<Arc<AppContext>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, ctx).await?;
        if !user.is_admin {
            return Err(TimebookError::Forbidden("Administrator access required".into()).into());
        }
        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| TimebookError::Auth("Missing bearer token".into()))?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| TimebookError::Auth("Malformed authorization header".into()).into())
}

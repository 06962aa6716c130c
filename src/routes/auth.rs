// ABOUTME: Login, logout, unauthorized, and session summary routes
// ABOUTME: Hands sign-in and sign-out to the identity provider and exposes the resolved session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! Authentication routes
//!
//! The console never sees credentials. `login` and `logout` redirect to the identity
//! provider, which sets or clears the session cookie the guard reads.

use crate::auth::{Session, SessionContext};
use crate::constants::{cookies, routes};
use crate::context::AppContext;
use crate::errors::{AppError, AppResult};
use crate::middleware::RouteGuard;
use crate::permissions::{ConsoleRole, ProjectRole};
use crate::utils::cookies::expired_cookie;
use axum::{
    extract::{Query, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Query of `GET /login`
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// Console path to come back to after sign-in
    pub return_to: Option<String>,
}

/// Body of `GET /api/session`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Identity-provider subject
    pub user_id: String,
    /// Email, when known
    pub email: Option<String>,
    /// Caller's tenant
    pub tenant_id: Option<String>,
    /// Console-wide roles
    pub roles: Vec<ConsoleRole>,
    /// Project roles keyed by project ID
    pub project_roles: BTreeMap<String, ProjectRole>,
    /// Platform administrator
    pub is_super_admin: bool,
    /// Tenant owner
    pub is_tenant_owner: bool,
    /// Token expiry
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionSummary {
    fn from(session: Session) -> Self {
        Self {
            is_super_admin: session.is_super_admin(),
            is_tenant_owner: session.is_tenant_owner(),
            user_id: session.user_id,
            email: session.email,
            tenant_id: session.tenant_id,
            roles: session.roles,
            project_roles: session.project_roles,
            expires_at: session.expires_at,
        }
    }
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the login, logout, unauthorized, and session routes
    pub fn routes(ctx: &Arc<AppContext>) -> Router {
        Router::new()
            .route(&ctx.config.routes.login, get(Self::handle_login))
            .route(routes::LOGOUT, get(Self::handle_logout))
            .route(&ctx.config.routes.unauthorized, get(Self::handle_unauthorized))
            .route(
                "/api/session",
                RouteGuard::authenticated().protect(ctx, get(Self::handle_session)),
            )
            .with_state(ctx.clone())
    }

    /// Redirect to the identity provider, asking it to come back to `return_to`
    async fn handle_login(
        State(ctx): State<Arc<AppContext>>,
        Query(query): Query<LoginQuery>,
    ) -> AppResult<Response> {
        let return_to = safe_return_path(query.return_to.as_deref());
        let mut login = Url::parse(&ctx.config.identity.login_url)
            .map_err(|e| AppError::config(format!("Invalid identity login URL: {e}")))?;
        login.query_pairs_mut().append_pair(
            "return_to",
            &format!("{}{return_to}", ctx.config.public_base_url),
        );
        Ok(redirect(login.as_str(), None))
    }

    /// Expire the session cookie and redirect to the identity provider
    async fn handle_logout(State(ctx): State<Arc<AppContext>>) -> Response {
        info!("Console logout requested");
        let cookie = expired_cookie(cookies::SESSION, ctx.secure_cookies());
        redirect(&ctx.config.identity.logout_url, Some(&cookie))
    }

    async fn handle_unauthorized() -> Response {
        (
            StatusCode::FORBIDDEN,
            Html(
                "<!DOCTYPE html><html><head><title>Unauthorized</title></head><body>\
                 <h1>Unauthorized</h1>\
                 <p>Your account does not have access to this page.</p>\
                 <p><a href=\"/\">Return to console</a></p></body></html>",
            ),
        )
            .into_response()
    }

    async fn handle_session(Extension(session): Extension<Session>) -> Json<SessionSummary> {
        Json(session.into())
    }
}

/// Accept only local absolute paths; anything else returns to the console root
fn safe_return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

fn redirect(location: &str, cookie: Option<&str>) -> Response {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(LOCATION, value);
        }
        Err(e) => {
            return AppError::config(format!("Invalid redirect location: {e}")).into_response();
        }
    }
    if let Some(value) = cookie.and_then(|c| HeaderValue::from_str(c).ok()) {
        headers.insert(SET_COOKIE, value);
    }
    (StatusCode::FOUND, headers).into_response()
}

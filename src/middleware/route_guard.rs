// ABOUTME: Role-based route guard evaluated before a handler runs
// ABOUTME: Loading gate, login redirect with return path, unauthorized redirect, session injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! Route Guard
//!
//! Every protected route declares the roles that may reach it. The guard resolves the
//! caller, evaluates the declaration, and either lets the request through with the
//! [`Session`](crate::auth::Session) inserted as a request extension or answers with a
//! redirect. Denials never surface as errors.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::{routing::get, Extension, Router};
//! use std::sync::Arc;
//! use tenant_console::auth::Session;
//! use tenant_console::constants::roles;
//! use tenant_console::context::AppContext;
//! use tenant_console::middleware::RouteGuard;
//!
//! async fn project_page(Extension(session): Extension<Session>) -> String {
//!     session.user_id
//! }
//!
//! fn router(ctx: &Arc<AppContext>) -> Router {
//!     Router::new().route(
//!         "/projects/:project_id",
//!         RouteGuard::new(&[roles::SUPERADMIN, roles::OWNER]).protect(ctx, get(project_page)),
//!     )
//! }
//! ```

use crate::auth::AuthContext;
use crate::constants::routes;
use crate::context::AppContext;
use crate::logging::ConsoleLogger;
use crate::permissions::{evaluate, GuardDecision, RequiredRole};
use axum::{
    extract::{RawPathParams, Request, State},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::MethodRouter,
};
use http::{
    header::{CACHE_CONTROL, RETRY_AFTER},
    HeaderValue, StatusCode,
};
use std::sync::Arc;
use tracing::debug;

/// Roles declared on a route, any of which grants access
#[derive(Debug, Clone)]
pub struct RouteGuard {
    required: Arc<[RequiredRole]>,
    project_param: String,
}

impl RouteGuard {
    /// Guard from role tokens; unknown tokens never match
    #[must_use]
    pub fn new(tokens: &[&str]) -> Self {
        Self::any_of(RequiredRole::from_tokens(tokens))
    }

    /// Guard from parsed roles
    #[must_use]
    pub fn any_of(roles: impl IntoIterator<Item = RequiredRole>) -> Self {
        Self {
            required: roles.into_iter().collect(),
            project_param: routes::PROJECT_ID_PARAM.to_owned(),
        }
    }

    /// Guard admitting every authenticated caller
    #[must_use]
    pub fn authenticated() -> Self {
        Self::any_of([])
    }

    /// Read the project ID from a differently named path parameter
    #[must_use]
    pub fn with_project_param(mut self, name: impl Into<String>) -> Self {
        self.project_param = name.into();
        self
    }

    /// Declared roles
    #[must_use]
    pub fn required(&self) -> &[RequiredRole] {
        &self.required
    }

    /// Wrap a method router so the guard runs before its handlers
    pub fn protect<S>(self, ctx: &Arc<AppContext>, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        route.route_layer(middleware::from_fn_with_state(
            GuardState {
                ctx: ctx.clone(),
                guard: self,
            },
            enforce,
        ))
    }

    fn project_id(&self, params: Option<&RawPathParams>) -> Option<String> {
        params?
            .iter()
            .find(|(name, _)| *name == self.project_param)
            .map(|(_, value)| value.to_owned())
    }
}

/// State handed to [`enforce`]
#[derive(Clone)]
pub struct GuardState {
    /// Application context
    pub ctx: Arc<AppContext>,
    /// Declaration being enforced
    pub guard: RouteGuard,
}

/// Guard middleware; install with [`RouteGuard::protect`]
pub async fn enforce(
    State(state): State<GuardState>,
    params: Option<RawPathParams>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth = state.ctx.sessions.resolve(request.headers()).await;
    let project_id = state.guard.project_id(params.as_ref());
    let decision = evaluate(&state.guard.required, &auth, project_id.as_deref());
    let path = request.uri().path().to_owned();

    match decision {
        GuardDecision::Allow => {
            debug!(path = %path, "Route guard allowed request");
            if let AuthContext::Authenticated(session) = auth {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        GuardDecision::Loading => loading_response(),
        GuardDecision::RedirectToLogin => {
            let return_to = request
                .uri()
                .path_and_query()
                .map_or(path.as_str(), |pq| pq.as_str());
            let login = &state.ctx.config.routes.login;
            ConsoleLogger::log_access_denied(&path, None, "unauthenticated");
            Redirect::to(&format!(
                "{login}?return_to={}",
                urlencoding::encode(return_to)
            ))
            .into_response()
        }
        GuardDecision::RedirectToUnauthorized => {
            let user_id = auth.session().map(|session| session.user_id.as_str());
            ConsoleLogger::log_access_denied(&path, user_id, "no declared role matched");
            Redirect::to(&state.ctx.config.routes.unauthorized).into_response()
        }
    }
}

fn loading_response() -> Response {
    let mut response = (
        StatusCode::SERVICE_UNAVAILABLE,
        Html("<!DOCTYPE html><html><body><p>Loading&hellip;</p></body></html>"),
    )
        .into_response();
    let headers = response.headers_mut();
    headers.insert(RETRY_AFTER, HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

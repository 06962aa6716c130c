// ABOUTME: Tests for the route guard as axum middleware on real routers
// ABOUTME: Loading gate, login and unauthorized redirects, and session injection into handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use axum::{http::StatusCode, routing::get, Extension, Router};
use std::sync::Arc;
use tenant_console::auth::{AuthContext, Session};
use tenant_console::context::AppContext;
use tenant_console::middleware::RouteGuard;

mod helpers;
use helpers::axum_test::AxumTestRequest;
use helpers::sessions::{jwt_context, static_context, TokenBuilder};

const UNUSED_BACKEND: &str = "http://127.0.0.1:9";

async fn whoami(Extension(session): Extension<Session>) -> String {
    session.user_id
}

fn guarded_router(ctx: &Arc<AppContext>) -> Router {
    Router::new()
        .route(
            "/admin",
            RouteGuard::new(&["SUPERADMIN"]).protect(ctx, get(whoami)),
        )
        .route(
            "/projects/:project_id",
            RouteGuard::new(&["SUPERADMIN", "OWNER", "DEPUTY"]).protect(ctx, get(whoami)),
        )
        .route(
            "/owner-only",
            RouteGuard::new(&["OWNER"]).protect(ctx, get(whoami)),
        )
        .route(
            "/workspaces/:workspace/settings",
            RouteGuard::new(&["MEMBER"])
                .with_project_param("workspace")
                .protect(ctx, get(whoami)),
        )
        .route("/me", RouteGuard::authenticated().protect(ctx, get(whoami)))
        .route("/bogus", RouteGuard::new(&["ADMIN"]).protect(ctx, get(whoami)))
}

#[tokio::test]
async fn test_anonymous_redirects_to_login_with_return_path() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let response = AxumTestRequest::get("/projects/p-1?tab=files")
        .send(guarded_router(&ctx))
        .await;

    assert!(response.status_code().is_redirection());
    assert_eq!(
        response.location(),
        "/login?return_to=%2Fprojects%2Fp-1%3Ftab%3Dfiles"
    );
}

#[tokio::test]
async fn test_invalid_token_is_treated_as_anonymous() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let response = AxumTestRequest::get("/me")
        .bearer("not-a-jwt")
        .send(guarded_router(&ctx))
        .await;
    assert!(response.location().starts_with("/login?return_to="));
}

#[tokio::test]
async fn test_expired_token_is_treated_as_anonymous() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let token = TokenBuilder::superadmin("u-admin").expired(600).token();
    let response = AxumTestRequest::get("/admin")
        .bearer(&token)
        .send(guarded_router(&ctx))
        .await;
    assert!(response.location().starts_with("/login"));
}

#[tokio::test]
async fn test_allowed_request_reaches_handler_with_session() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let token = TokenBuilder::superadmin("u-admin").token();
    let response = AxumTestRequest::get("/admin")
        .bearer(&token)
        .send(guarded_router(&ctx))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.text(), "u-admin");
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let token = TokenBuilder::new("u-cookie").token();
    let response = AxumTestRequest::get("/me")
        .cookie("console_session", &token)
        .send(guarded_router(&ctx))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.text(), "u-cookie");
}

#[tokio::test]
async fn test_missing_role_redirects_to_unauthorized() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let token = TokenBuilder::tenant_owner("u-owner", "t-1").token();
    let response = AxumTestRequest::get("/admin")
        .bearer(&token)
        .send(guarded_router(&ctx))
        .await;
    assert!(response.status_code().is_redirection());
    assert_eq!(response.location(), "/unauthorized");
}

#[tokio::test]
async fn test_project_role_read_from_path() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let token = TokenBuilder::new("u-deputy")
        .project_role("p-1", "DEPUTY")
        .token();

    let allowed = AxumTestRequest::get("/projects/p-1")
        .bearer(&token)
        .send(guarded_router(&ctx))
        .await;
    assert_eq!(allowed.status(), 200);

    let other_project = AxumTestRequest::get("/projects/p-2")
        .bearer(&token)
        .send(guarded_router(&ctx))
        .await;
    assert_eq!(other_project.location(), "/unauthorized");
}

#[tokio::test]
async fn test_project_role_without_project_param_is_denied() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let token = TokenBuilder::new("u-owner")
        .project_role("p-1", "OWNER")
        .token();
    let response = AxumTestRequest::get("/owner-only")
        .bearer(&token)
        .send(guarded_router(&ctx))
        .await;
    assert_eq!(response.location(), "/unauthorized");
}

#[tokio::test]
async fn test_custom_project_param_name() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let token = TokenBuilder::new("u-member")
        .project_role("ws-7", "MEMBER")
        .token();
    let response = AxumTestRequest::get("/workspaces/ws-7/settings")
        .bearer(&token)
        .send(guarded_router(&ctx))
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_unknown_role_token_fails_closed() {
    let ctx = jwt_context(UNUSED_BACKEND);
    let token = TokenBuilder::superadmin("u-admin").role("ADMIN").token();
    let response = AxumTestRequest::get("/bogus")
        .bearer(&token)
        .send(guarded_router(&ctx))
        .await;
    assert_eq!(response.location(), "/unauthorized");
}

#[tokio::test]
async fn test_loading_session_blocks_with_retry() {
    let ctx = static_context(UNUSED_BACKEND, AuthContext::Loading);
    let response = AxumTestRequest::get("/admin")
        .send(guarded_router(&ctx))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.header("retry-after").as_deref(), Some("1"));
}

#[tokio::test]
async fn test_configured_redirect_targets() {
    let mut config = helpers::sessions::test_config(UNUSED_BACKEND);
    config.routes.login = "/signin".to_owned();
    config.routes.unauthorized = "/denied".to_owned();
    let ctx = Arc::new(AppContext::from_config(config).unwrap());

    let anonymous = AxumTestRequest::get("/admin")
        .send(guarded_router(&ctx))
        .await;
    assert!(anonymous.location().starts_with("/signin?return_to="));

    let token = TokenBuilder::new("u-plain").token();
    let denied = AxumTestRequest::get("/admin")
        .bearer(&token)
        .send(guarded_router(&ctx))
        .await;
    assert_eq!(denied.location(), "/denied");
}

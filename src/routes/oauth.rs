// ABOUTME: HTTP surface of the cloud-provider OAuth connection flow
// ABOUTME: Connect redirect with flow cookie, and the redirect-back callback rendering a result page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! `OAuth` connection routes
//!
//! - `GET /api/tenants/:tenant_id/integrations/:integration_id/connect` starts a flow and
//!   answers `302` to the provider, setting the `console_oauth_flow` cookie.
//! - `GET /oauth/callback` finishes it and renders an HTML result page.

use crate::api::{CloudProviders, IntegrationApi, ResourceApi};
use crate::auth::Session;
use crate::constants::{cookies, roles, routes};
use crate::context::AppContext;
use crate::errors::{AppError, AppResult};
use crate::middleware::RouteGuard;
use crate::oauth2_client::{CallbackOutcome, CallbackParams, ConnectRequest, OAuthStateToken};
use crate::permissions::ensure_tenant_access;
use crate::utils::cookies::{cookie_value, expired_cookie, http_only_cookie};
use axum::{
    extract::{Path, Query, State},
    http::{
        header::{CACHE_CONTROL, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tracing::{info, warn};

/// `OAuth` connection routes
pub struct OAuthRoutes;

impl OAuthRoutes {
    /// Create the connect and callback routes
    pub fn routes(ctx: &Arc<AppContext>) -> Router {
        Router::new()
            .route(
                "/api/tenants/:tenant_id/integrations/:integration_id/connect",
                RouteGuard::new(&[roles::SUPERADMIN, roles::TENANT_OWNER])
                    .protect(ctx, get(Self::handle_connect)),
            )
            .route(
                routes::OAUTH_CALLBACK,
                RouteGuard::new(&[roles::SUPERADMIN, roles::TENANT_OWNER])
                    .protect(ctx, get(Self::handle_callback)),
            )
            .with_state(ctx.clone())
    }

    /// Start a connection and redirect to the provider
    async fn handle_connect(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Path((tenant_id, integration_id)): Path<(String, String)>,
    ) -> AppResult<Response> {
        ensure_tenant_access(&session, &tenant_id)?;
        let token = session.bearer_token();

        let integration = IntegrationApi::new(&ctx.api, &tenant_id, token)
            .get(&integration_id)
            .await?;
        let provider = ResourceApi::<CloudProviders>::new(&ctx.api, token)
            .get(&integration.cloud_provider_id)
            .await?;

        let flow_key = OAuthStateToken::generate_nonce();
        let initiation = ctx
            .oauth_flow
            .initiate(
                &flow_key,
                ConnectRequest {
                    tenant_id,
                    integration_id,
                    user_id: Some(session.user_id.clone()),
                    provider,
                },
            )
            .await?;

        let cookie = http_only_cookie(
            cookies::OAUTH_FLOW,
            &flow_key,
            ctx.config.oauth.flow_retention().as_secs(),
            ctx.secure_cookies(),
        );
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, header_value(&initiation.authorization_url)?);
        headers.insert(SET_COOKIE, header_value(&cookie)?);
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        Ok((StatusCode::FOUND, headers).into_response())
    }

    /// Finish a connection from the provider's redirect-back
    async fn handle_callback(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        headers: HeaderMap,
        Query(params): Query<CallbackParams>,
    ) -> AppResult<Response> {
        let flow_key = cookie_value(&headers, cookies::OAUTH_FLOW);
        if flow_key.is_none() {
            warn!(user.id = %session.user_id, "OAuth callback arrived without a flow cookie");
        }

        let outcome = ctx
            .oauth_flow
            .process_callback(flow_key.as_deref(), &params, &session)
            .await?;

        let (status, page) = if outcome.state.is_complete() {
            info!(user.id = %session.user_id, "OAuth connection flow completed");
            (StatusCode::OK, OAuthTemplateRenderer::render_success(&outcome))
        } else {
            (
                StatusCode::BAD_REQUEST,
                OAuthTemplateRenderer::render_error(&outcome),
            )
        };

        let mut response = (status, Html(page)).into_response();
        let response_headers = response.headers_mut();
        response_headers.insert(
            SET_COOKIE,
            header_value(&expired_cookie(cookies::OAUTH_FLOW, ctx.secure_cookies()))?,
        );
        response_headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        Ok(response)
    }
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::internal(format!("Invalid response header value: {e}")))
}

/// Renders the `OAuth` result pages
pub struct OAuthTemplateRenderer;

impl OAuthTemplateRenderer {
    const SUCCESS_TEMPLATE: &'static str = include_str!("../../templates/oauth_success.html");
    const ERROR_TEMPLATE: &'static str = include_str!("../../templates/oauth_error.html");

    /// Success page for a completed flow
    #[must_use]
    pub fn render_success(outcome: &CallbackOutcome) -> String {
        let integration = outcome.integration.as_ref();
        let provider = integration
            .and_then(|i| i.name.as_deref())
            .unwrap_or("Cloud provider");
        let integration_id = integration
            .map(|i| i.id.as_str())
            .or(outcome.state.integration_id.as_deref())
            .unwrap_or_default();

        Self::SUCCESS_TEMPLATE
            .replace("{{PROVIDER}}", &html_escape::encode_text(provider))
            .replace("{{INTEGRATION}}", &html_escape::encode_text(integration_id))
            .replace("{{PROGRESS}}", &outcome.state.progress.to_string())
            .replace("{{RETURN_URL}}", "/")
    }

    /// Error page with retry and return links
    #[must_use]
    pub fn render_error(outcome: &CallbackOutcome) -> String {
        let (code, message, description) = outcome.state.error.as_ref().map_or(
            ("unknown", "The connection could not be completed", None),
            |error| {
                (
                    error.kind.as_str(),
                    error.message.as_str(),
                    error.description.as_deref(),
                )
            },
        );

        let description_html = description
            .map(|d| {
                format!(
                    "<div class=\"description\">{}</div>",
                    html_escape::encode_text(d)
                )
            })
            .unwrap_or_default();

        let retry_html = match (
            outcome.tenant_id.as_deref(),
            outcome.state.integration_id.as_deref(),
        ) {
            (Some(tenant_id), Some(integration_id)) => format!(
                "<a class=\"button primary\" href=\"/api/tenants/{}/integrations/{}/connect\">Try again</a>",
                html_escape::encode_double_quoted_attribute(&urlencoding::encode(tenant_id)),
                html_escape::encode_double_quoted_attribute(&urlencoding::encode(integration_id)),
            ),
            _ => String::new(),
        };

        Self::ERROR_TEMPLATE
            .replace("{{ERROR_CODE}}", &html_escape::encode_text(code))
            .replace("{{ERROR}}", &html_escape::encode_text(message))
            .replace("{{DESCRIPTION}}", &description_html)
            .replace("{{RETRY_LINK}}", &retry_html)
            .replace("{{RETURN_URL}}", "/")
    }
}

// ABOUTME: Delegates the authorization code exchange to the trusted backend
// ABOUTME: The console never holds provider client secrets; the backend redeems the code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::errors::{OAuthError, OAuthErrorKind};
use crate::api::client::{segment, status_error, ApiClient};
use crate::api::envelope::decode;
use crate::models::TenantIntegration;
use crate::utils::http_client;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use tracing::warn;

/// Code exchange request forwarded to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenExchangeRequest {
    /// Tenant owning the integration
    #[serde(skip)]
    pub tenant_id: String,
    /// Integration being connected
    #[serde(skip)]
    pub integration_id: String,
    /// Authorization code from the callback
    pub code: String,
    /// PKCE verifier; absent for legacy callbacks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<String>,
    /// Redirect URI used in the authorization request
    pub redirect_uri: String,
}

/// Redeems authorization codes
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchange the code and return the activated integration
    async fn exchange(
        &self,
        request: &TokenExchangeRequest,
        bearer_token: Option<&str>,
    ) -> Result<TenantIntegration, OAuthError>;
}

/// [`TokenExchanger`] posting to
/// `POST /tenants/:tenantId/integrations/:integrationId/oauth/exchange`
pub struct BackendTokenExchanger {
    api: ApiClient,
}

impl BackendTokenExchanger {
    /// Exchanger for the backend at `base_url`, using the short `OAuth` timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_api(ApiClient::with_client(http_client::oauth_client(), base_url))
    }

    /// Exchanger over an existing API client
    #[must_use]
    pub const fn with_api(api: ApiClient) -> Self {
        Self { api }
    }

    fn exchange_path(request: &TokenExchangeRequest) -> String {
        format!(
            "tenants/{}/integrations/{}/oauth/exchange",
            segment(&request.tenant_id),
            segment(&request.integration_id)
        )
    }
}

#[async_trait]
impl TokenExchanger for BackendTokenExchanger {
    async fn exchange(
        &self,
        request: &TokenExchangeRequest,
        bearer_token: Option<&str>,
    ) -> Result<TenantIntegration, OAuthError> {
        let reply = self
            .api
            .send(
                Method::POST,
                &Self::exchange_path(request),
                Some(request),
                bearer_token,
            )
            .await
            .map_err(|e| {
                OAuthError::new(OAuthErrorKind::ExchangeFailed).with_description(e.message)
            })?;

        if !reply.status.is_success() {
            let kind = reply
                .envelope
                .error_code()
                .map_or(OAuthErrorKind::Unknown, |code| OAuthErrorKind::from_code(&code));
            let detail = status_error(reply.status, &reply.envelope).message;
            warn!(
                tenant.id = %request.tenant_id,
                integration.id = %request.integration_id,
                http.status = %reply.status,
                oauth.error = %kind,
                "Backend token exchange rejected"
            );
            return Err(match kind {
                OAuthErrorKind::Unknown => classify_status(reply.status).with_description(detail),
                known => OAuthError::new(known).with_description(detail),
            });
        }

        let payload = reply.envelope.normalize().map_err(|e| {
            OAuthError::new(OAuthErrorKind::ExchangeFailed).with_description(e.message)
        })?;
        decode(payload).map_err(|e| {
            OAuthError::new(OAuthErrorKind::ExchangeFailed).with_description(e.message)
        })
    }
}

fn classify_status(status: StatusCode) -> OAuthError {
    match status {
        StatusCode::SERVICE_UNAVAILABLE => OAuthError::new(OAuthErrorKind::TemporarilyUnavailable),
        _ => OAuthError::new(OAuthErrorKind::ExchangeFailed),
    }
}

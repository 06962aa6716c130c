// ABOUTME: Drives a tenant integration from "not connected" to "active" through OAuth + PKCE
// ABOUTME: Initiation, callback validation with legacy fallback, and backend token exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! # Connection Flow
//!
//! ```text
//! initiate ──► save PendingFlow ──► redirect to provider
//!                                          │
//! process_callback ◄───────────────────────┘
//!   take PendingFlow ─► validate_callback ─► tenant access ─► exchange ─► Completion
//!                              │                  │              │
//!                              └───────────── Error ◄────────────┘
//! ```

use super::client::{OAuth2Client, ProviderOAuthConfig};
use super::errors::{OAuthError, OAuthErrorKind};
use super::exchange::{TokenExchangeRequest, TokenExchanger};
use super::flow::{FlowStep, OAuthFlowState};
use super::pkce::PkceParams;
use super::state::{LegacyState, OAuthStateToken, RedirectState};
use super::store::{FlowStateStore, PendingFlow};
use crate::auth::Session;
use crate::config::environment::OAuthFlowConfig;
use crate::errors::AppResult;
use crate::logging::ConsoleLogger;
use crate::models::{CloudProvider, IntegrationStatus, TenantIntegration};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

/// A user's request to connect a provider
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    /// Tenant owning the integration
    pub tenant_id: String,
    /// Integration to connect
    pub integration_id: String,
    /// Initiating user
    pub user_id: Option<String>,
    /// Provider to authorize against
    pub provider: CloudProvider,
}

/// Result of [`OAuthConnectionFlow::initiate`]
#[derive(Debug, Clone)]
pub struct FlowInitiation {
    /// Where to send the user agent
    pub authorization_url: String,
    /// Flow state, at `Authorization`
    pub state: OAuthFlowState,
}

/// Redirect-back query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    /// Authorization code
    pub code: Option<String>,
    /// Echoed state
    pub state: Option<String>,
    /// Provider error code
    pub error: Option<String>,
    /// Provider error detail
    pub error_description: Option<String>,
}

/// How strongly a callback was correlated with its initiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assurance {
    /// Nonce, identifiers and freshness checked; the verifier is sent with the code
    Full,
    /// Legacy state: presence checks only, no verifier
    Reduced,
}

/// A callback accepted for token exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCallback {
    /// Tenant owning the integration
    pub tenant_id: String,
    /// Integration being connected
    pub integration_id: String,
    /// Authorization code
    pub code: String,
    /// Verifier to send with the code; `None` on the legacy path
    pub code_verifier: Option<String>,
    /// Correlation strength
    pub assurance: Assurance,
}

/// Result of [`OAuthConnectionFlow::process_callback`]
#[derive(Debug, Clone)]
pub struct CallbackOutcome {
    /// Final flow state, `Completion` or `Error`
    pub state: OAuthFlowState,
    /// Tenant, once known
    pub tenant_id: Option<String>,
    /// Activated integration on success
    pub integration: Option<TenantIntegration>,
}

/// The `OAuth` connection flow service
pub struct OAuthConnectionFlow {
    store: Arc<dyn FlowStateStore>,
    exchanger: Arc<dyn TokenExchanger>,
    redirect_uri: String,
    config: OAuthFlowConfig,
}

impl OAuthConnectionFlow {
    /// Create the service
    pub fn new(
        store: Arc<dyn FlowStateStore>,
        exchanger: Arc<dyn TokenExchanger>,
        redirect_uri: impl Into<String>,
        config: OAuthFlowConfig,
    ) -> Self {
        Self {
            store,
            exchanger,
            redirect_uri: redirect_uri.into(),
            config,
        }
    }

    /// Console callback URL registered with providers
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Start a connection: generate PKCE and state, persist them, build the provider URL
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be connected or the flow cannot be persisted
    pub async fn initiate(
        &self,
        flow_key: &str,
        request: ConnectRequest,
    ) -> AppResult<FlowInitiation> {
        let mut state = OAuthFlowState::for_integration(&request.integration_id);

        let client = OAuth2Client::new(ProviderOAuthConfig::from_provider(
            &request.provider,
            &self.redirect_uri,
        )?);
        let pkce = PkceParams::generate();
        let token = OAuthStateToken::new(
            &request.integration_id,
            &request.tenant_id,
            pkce.code_verifier.clone(),
            request.user_id,
        );
        let authorization_url = client.authorization_url(&token.redirect_param()?, &pkce)?;

        self.store
            .save(
                flow_key,
                PendingFlow {
                    token,
                    code_challenge: pkce.code_challenge,
                },
            )
            .await?;

        state.advance(FlowStep::Authorization)?;
        ConsoleLogger::log_oauth_event(
            &request.tenant_id,
            &request.integration_id,
            "authorization_redirect",
            true,
        );
        Ok(FlowInitiation {
            authorization_url,
            state,
        })
    }

    /// Validate a callback against the pending flow taken from the store
    ///
    /// `fallback_tenant` supplies the tenant for legacy states, which do not carry one.
    ///
    /// # Errors
    ///
    /// Returns the [`OAuthError`] that terminates the flow
    pub fn validate_callback(
        &self,
        pending: Option<&PendingFlow>,
        params: &CallbackParams,
        fallback_tenant: Option<&str>,
    ) -> Result<ValidatedCallback, OAuthError> {
        self.validate_callback_at(
            pending,
            params,
            fallback_tenant,
            Utc::now().timestamp_millis(),
        )
    }

    /// [`OAuthConnectionFlow::validate_callback`] at a given time
    ///
    /// # Errors
    ///
    /// Returns the [`OAuthError`] that terminates the flow
    pub fn validate_callback_at(
        &self,
        pending: Option<&PendingFlow>,
        params: &CallbackParams,
        fallback_tenant: Option<&str>,
        now_ms: i64,
    ) -> Result<ValidatedCallback, OAuthError> {
        if let Some(error) = params.error.as_deref().filter(|e| !e.is_empty()) {
            return Err(OAuthError::from_provider(
                error,
                params.error_description.as_deref(),
            ));
        }

        let (Some(code), Some(raw_state)) = (
            params.code.as_deref().filter(|c| !c.is_empty()),
            params.state.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(OAuthError::new(OAuthErrorKind::MissingParameters));
        };

        match RedirectState::parse(raw_state) {
            Ok(returned) => self.validate_structured(pending, &returned, code, now_ms),
            Err(parse_error) => {
                debug!("Callback state is not structured: {parse_error}");
                match LegacyState::parse(raw_state) {
                    Some(legacy) if self.config.allow_legacy_state => {
                        Self::accept_legacy(pending, &legacy, code, fallback_tenant)
                    }
                    Some(_) => {
                        warn!("Legacy OAuth state rejected by configuration");
                        Err(OAuthError::new(OAuthErrorKind::InvalidState))
                    }
                    None => Err(OAuthError::new(OAuthErrorKind::InvalidState)),
                }
            }
        }
    }

    fn validate_structured(
        &self,
        pending: Option<&PendingFlow>,
        returned: &RedirectState,
        code: &str,
        now_ms: i64,
    ) -> Result<ValidatedCallback, OAuthError> {
        let Some(pending) = pending else {
            return Err(OAuthError::new(OAuthErrorKind::StateMismatch)
                .with_description("No connection request is pending for this browser"));
        };
        let stored = &pending.token;

        let nonce_matches: bool = stored
            .nonce
            .as_bytes()
            .ct_eq(returned.nonce.as_bytes())
            .into();
        if !nonce_matches
            || stored.integration_id != returned.integration_id
            || stored.tenant_id != returned.tenant_id
        {
            return Err(OAuthError::new(OAuthErrorKind::StateMismatch));
        }

        if !stored.is_fresh_at(now_ms, self.config.state_ttl()) {
            return Err(OAuthError::new(OAuthErrorKind::StateExpired));
        }

        // Store integrity: the verifier must still hash to the challenge sent to the provider
        if !PkceParams::verify(&stored.code_verifier, &pending.code_challenge) {
            return Err(OAuthError::new(OAuthErrorKind::PkceVerificationFailed));
        }

        Ok(ValidatedCallback {
            tenant_id: stored.tenant_id.clone(),
            integration_id: stored.integration_id.clone(),
            code: code.to_owned(),
            code_verifier: Some(stored.code_verifier.clone()),
            assurance: Assurance::Full,
        })
    }

    fn accept_legacy(
        pending: Option<&PendingFlow>,
        legacy: &LegacyState,
        code: &str,
        fallback_tenant: Option<&str>,
    ) -> Result<ValidatedCallback, OAuthError> {
        let tenant_id = pending
            .filter(|p| p.token.integration_id == legacy.integration_id)
            .map(|p| p.token.tenant_id.as_str())
            .or(fallback_tenant)
            .ok_or_else(|| {
                OAuthError::new(OAuthErrorKind::InvalidState)
                    .with_description("Legacy state does not identify a tenant")
            })?;

        ConsoleLogger::log_reduced_assurance(Some(tenant_id), &legacy.integration_id);
        Ok(ValidatedCallback {
            tenant_id: tenant_id.to_owned(),
            integration_id: legacy.integration_id.clone(),
            code: code.to_owned(),
            code_verifier: None,
            assurance: Assurance::Reduced,
        })
    }

    /// Exchange a validated callback through the backend
    ///
    /// # Errors
    ///
    /// Returns the exchanger's [`OAuthError`]
    pub async fn exchange(
        &self,
        callback: &ValidatedCallback,
        bearer_token: Option<&str>,
    ) -> Result<TenantIntegration, OAuthError> {
        let request = TokenExchangeRequest {
            tenant_id: callback.tenant_id.clone(),
            integration_id: callback.integration_id.clone(),
            code: callback.code.clone(),
            code_verifier: callback.code_verifier.clone(),
            redirect_uri: self.redirect_uri.clone(),
        };
        let mut integration = self.exchanger.exchange(&request, bearer_token).await?;

        integration.status = IntegrationStatus::Active;
        integration.error_message = None;
        if integration.connected_at.is_none() {
            integration.connected_at = Some(Utc::now());
        }
        Ok(integration)
    }

    /// Handle the redirect-back: take the pending flow, validate, exchange
    ///
    /// The caller must be allowed to manage the tenant the callback resolves to; the legacy
    /// path takes that tenant from the caller's session. Every failure ends in `Error`; the
    /// pending flow is consumed either way.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store fails or the state machine is misused
    pub async fn process_callback(
        &self,
        flow_key: Option<&str>,
        params: &CallbackParams,
        caller: &Session,
    ) -> AppResult<CallbackOutcome> {
        let pending = match flow_key {
            Some(key) => self.store.take(key).await?,
            None => None,
        };

        let mut state = OAuthFlowState::awaiting_callback();
        state.integration_id = pending.as_ref().map(|p| p.token.integration_id.clone());
        state.advance(FlowStep::Callback)?;

        let validated = match self
            .validate_callback(pending.as_ref(), params, caller.tenant_id.as_deref())
            .and_then(|validated| Self::authorize_caller(caller, validated))
        {
            Ok(validated) => validated,
            Err(error) => {
                let tenant_id = pending.map(|p| p.token.tenant_id);
                ConsoleLogger::log_oauth_event(
                    tenant_id.as_deref().unwrap_or("unknown"),
                    state.integration_id.as_deref().unwrap_or("unknown"),
                    error.kind.as_str(),
                    false,
                );
                state.fail(error)?;
                return Ok(CallbackOutcome {
                    state,
                    tenant_id,
                    integration: None,
                });
            }
        };

        state.integration_id = Some(validated.integration_id.clone());
        state.advance(FlowStep::TokenExchange)?;

        match self.exchange(&validated, caller.bearer_token()).await {
            Ok(integration) => {
                state.advance(FlowStep::Completion)?;
                info!(
                    tenant.id = %validated.tenant_id,
                    integration.id = %validated.integration_id,
                    scopes = ?integration.scopes,
                    "Cloud provider integration connected"
                );
                Ok(CallbackOutcome {
                    state,
                    tenant_id: Some(validated.tenant_id),
                    integration: Some(integration),
                })
            }
            Err(error) => {
                ConsoleLogger::log_oauth_event(
                    &validated.tenant_id,
                    &validated.integration_id,
                    error.kind.as_str(),
                    false,
                );
                state.fail(error)?;
                Ok(CallbackOutcome {
                    state,
                    tenant_id: Some(validated.tenant_id),
                    integration: None,
                })
            }
        }
    }

    fn authorize_caller(
        caller: &Session,
        validated: ValidatedCallback,
    ) -> Result<ValidatedCallback, OAuthError> {
        if caller.can_manage_tenant(&validated.tenant_id) {
            return Ok(validated);
        }
        warn!(
            user.id = %caller.user_id,
            tenant.id = %validated.tenant_id,
            integration.id = %validated.integration_id,
            "OAuth callback refused: caller cannot manage tenant"
        );
        Err(OAuthError::new(OAuthErrorKind::AccessDenied)
            .with_description("You are not allowed to connect integrations for this tenant"))
    }

    /// Drop pending flows abandoned for longer than the retention window
    ///
    /// Retention outlasts the freshness window so a late callback still finds its flow and
    /// reports `state_expired`.
    pub async fn purge_expired(&self) -> usize {
        self.store.purge_expired(self.config.flow_retention()).await
    }
}

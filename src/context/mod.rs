// ABOUTME: Application context built once at startup and shared with every handler
// ABOUTME: Holds configuration, session resolver, backend client, and the OAuth flow service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! Explicit application context
//!
//! Nothing in the console reads ambient global state: the session resolver, backend
//! client, and flow service are constructed here and threaded through axum state.

use crate::api::ApiClient;
use crate::auth::{JwtSessionResolver, SessionResolver};
use crate::config::environment::ConsoleConfig;
use crate::errors::{AppError, AppResult};
use crate::oauth2_client::{
    BackendTokenExchanger, FlowStateStore, InMemoryFlowStateStore, OAuthConnectionFlow,
    TokenExchanger,
};
use std::sync::Arc;

/// Shared dependencies of the console
pub struct AppContext {
    /// Loaded configuration
    pub config: ConsoleConfig,
    /// Resolves callers from request headers
    pub sessions: Arc<dyn SessionResolver>,
    /// Backend REST client
    pub api: ApiClient,
    /// `OAuth` connection flow service
    pub oauth_flow: OAuthConnectionFlow,
}

impl AppContext {
    /// Production wiring: JWT sessions, in-memory flow store, backend exchanger
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn from_config(config: ConsoleConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(|e| AppError::config(e.to_string()))?;
        let sessions: Arc<dyn SessionResolver> =
            Arc::new(JwtSessionResolver::from_config(&config.identity));
        let store: Arc<dyn FlowStateStore> = Arc::new(InMemoryFlowStateStore::new());
        let exchanger: Arc<dyn TokenExchanger> =
            Arc::new(BackendTokenExchanger::new(config.backend_api_url.clone()));
        Ok(Self::with_components(config, sessions, store, exchanger))
    }

    /// Wiring with explicit components
    #[must_use]
    pub fn with_components(
        config: ConsoleConfig,
        sessions: Arc<dyn SessionResolver>,
        store: Arc<dyn FlowStateStore>,
        exchanger: Arc<dyn TokenExchanger>,
    ) -> Self {
        let api = ApiClient::new(config.backend_api_url.clone());
        let oauth_flow =
            OAuthConnectionFlow::new(store, exchanger, config.oauth_redirect_uri(), config.oauth);
        Self {
            config,
            sessions,
            api,
            oauth_flow,
        }
    }

    /// Whether cookies must carry the `Secure` attribute
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.config.public_base_url.starts_with("https://")
    }
}

// ABOUTME: OAuth 2.0 client implementation for connecting tenants to cloud storage providers
// ABOUTME: Authorization-code flow with PKCE, state correlation, and backend token exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! # OAuth 2.0 Client Module
//!
//! The console acts as an `OAuth 2.0` client on behalf of a tenant. It:
//! - generates PKCE parameters and a CSRF nonce per connection attempt
//! - persists the flow before redirecting to the provider
//! - correlates the redirect-back with the persisted flow
//! - hands the code and verifier to the backend, which holds the client secret

/// Authorization URL construction
pub mod client;
/// Connection flow service
pub mod connection;
/// Flow error taxonomy
pub mod errors;
/// Backend token exchange
pub mod exchange;
/// Flow state machine
pub mod flow;
/// PKCE generation and verification
pub mod pkce;
/// State token encoding
pub mod state;
/// Pending flow storage
pub mod store;

pub use client::{OAuth2Client, ProviderOAuthConfig};
pub use connection::{
    Assurance, CallbackOutcome, CallbackParams, ConnectRequest, FlowInitiation,
    OAuthConnectionFlow, ValidatedCallback,
};
pub use errors::{OAuthError, OAuthErrorKind};
pub use exchange::{BackendTokenExchanger, TokenExchangeRequest, TokenExchanger};
pub use flow::{FlowStep, OAuthFlowState};
pub use pkce::{validate_verifier, PkceParams};
pub use state::{LegacyState, OAuthStateToken, RedirectState};
pub use store::{FlowStateStore, InMemoryFlowStateStore, PendingFlow};

// ABOUTME: Main library entry point for the multi-tenant administration console
// ABOUTME: Role-gated HTTP routes, cloud-provider OAuth linking, and REST backend data access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

#![deny(unsafe_code)]

//! # Tenant Console
//!
//! Backend-for-frontend service of the multi-tenant administration console.
//!
//! ## Architecture
//!
//! - **Auth**: resolves the caller's session from identity-provider tokens
//! - **Middleware**: the route guard gating every console route by role
//! - **`OAuth2` client**: authorization-code + PKCE flow linking cloud providers to tenants
//! - **API**: data access to the REST backend with response normalization
//! - **Routes**: the axum router tying it together
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tenant_console::config::environment::ConsoleConfig;
//! use tenant_console::context::AppContext;
//! use tenant_console::routes::ConsoleRoutes;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ConsoleConfig::from_env()?;
//! let context = Arc::new(AppContext::from_config(config)?);
//! let _router = ConsoleRoutes::router(context);
//! # Ok(())
//! # }
//! ```

/// Backend REST API data-access layer
pub mod api;

/// Session resolution and the authentication context
pub mod auth;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Application context shared by every handler
pub mod context;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (route guard)
pub mod middleware;

/// Domain models mirrored from the backend
pub mod models;

/// `OAuth 2.0` client side of the cloud-provider connection flow
pub mod oauth2_client;

/// Role vocabulary and access evaluation
pub mod permissions;

/// HTTP routes
pub mod routes;

/// Shared utilities
pub mod utils;

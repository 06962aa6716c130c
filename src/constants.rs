// ABOUTME: Application constants re-exported from the core crate plus environment variable names
// ABOUTME: Keeps configuration keys and their defaults next to each other
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

pub use tenant_console_core::constants::{cookies, oauth, roles, routes, service_names};

/// Environment variable names read by [`crate::config::environment::ConsoleConfig`]
pub mod env_keys {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Base URL of the REST backend
    pub const BACKEND_API_URL: &str = "BACKEND_API_URL";
    /// Externally visible base URL of this console
    pub const PUBLIC_BASE_URL: &str = "PUBLIC_BASE_URL";
    /// HS256 secret used to validate session tokens
    pub const SESSION_JWT_SECRET: &str = "SESSION_JWT_SECRET";
    /// Expected `aud` claim of session tokens
    pub const SESSION_JWT_AUDIENCE: &str = "SESSION_JWT_AUDIENCE";
    /// Identity provider login page
    pub const IDP_LOGIN_URL: &str = "IDP_LOGIN_URL";
    /// Identity provider logout page
    pub const IDP_LOGOUT_URL: &str = "IDP_LOGOUT_URL";
    /// Console login route
    pub const LOGIN_ROUTE: &str = "LOGIN_ROUTE";
    /// Console unauthorized route
    pub const UNAUTHORIZED_ROUTE: &str = "UNAUTHORIZED_ROUTE";
    /// OAuth state freshness window in seconds
    pub const OAUTH_STATE_TTL_SECS: &str = "OAUTH_STATE_TTL_SECS";
    /// Accept the pre-token legacy callback format
    pub const OAUTH_ALLOW_LEGACY_STATE: &str = "OAUTH_ALLOW_LEGACY_STATE";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log level fallback when `RUST_LOG` is unset
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Log output format
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Default values for configuration
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8080;
    /// Default backend URL for local development
    pub const BACKEND_API_URL: &str = "http://localhost:3000/api";
    /// Default public URL for local development
    pub const PUBLIC_BASE_URL: &str = "http://localhost:8080";
    /// Minimum accepted session secret length in bytes
    pub const MIN_JWT_SECRET_LENGTH: usize = 32;
    /// Interval between purges of abandoned OAuth flows, in seconds
    pub const FLOW_PURGE_INTERVAL_SECS: u64 = 60;
}

/// HTTP timeouts for outbound clients
pub mod timeouts {
    /// Backend API request timeout
    pub const API_TIMEOUT_SECS: u64 = 30;
    /// Backend API connect timeout
    pub const API_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Token exchange request timeout
    pub const OAUTH_TIMEOUT_SECS: u64 = 15;
    /// Token exchange connect timeout
    pub const OAUTH_CONNECT_TIMEOUT_SECS: u64 = 5;
}

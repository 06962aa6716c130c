// ABOUTME: Application-wide constants for roles, OAuth parameters, and console routes
// ABOUTME: Centralizes literal values shared by the guard, OAuth flow, and HTTP layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

/// Role tokens as they appear in route declarations and identity claims
pub mod roles {
    /// Platform-wide administrator
    pub const SUPERADMIN: &str = "SUPERADMIN";
    /// Owner of the caller's tenant
    pub const TENANT_OWNER: &str = "TENANT_OWNER";
    /// Project owner
    pub const OWNER: &str = "OWNER";
    /// Project deputy
    pub const DEPUTY: &str = "DEPUTY";
    /// Project member
    pub const MEMBER: &str = "MEMBER";
}

/// OAuth 2.0 client constants
pub mod oauth {
    /// Length of generated PKCE code verifiers
    pub const CODE_VERIFIER_LENGTH: usize = 128;
    /// RFC 7636 minimum verifier length
    pub const CODE_VERIFIER_MIN_LENGTH: usize = 43;
    /// RFC 7636 maximum verifier length
    pub const CODE_VERIFIER_MAX_LENGTH: usize = 128;
    /// The only supported challenge method
    pub const CODE_CHALLENGE_METHOD: &str = "S256";
    /// Random bytes in a CSRF nonce before encoding
    pub const NONCE_BYTES: usize = 32;
    /// Minimum nonce length accepted from the legacy state format
    pub const LEGACY_NONCE_MIN_LENGTH: usize = 16;
    /// Default freshness window for OAuth state, in seconds
    pub const DEFAULT_STATE_TTL_SECS: u64 = 600;
    /// Pending flows are purged after this many freshness windows
    pub const FLOW_RETENTION_TTL_MULTIPLIER: u64 = 2;
    /// Allowed clock skew for state timestamps issued "in the future", in milliseconds
    pub const STATE_CLOCK_SKEW_MS: i64 = 30_000;
    /// Response type requested from providers
    pub const RESPONSE_TYPE_CODE: &str = "code";
}

/// HTTP routes served by the console
pub mod routes {
    /// Default login route
    pub const LOGIN: &str = "/login";
    /// Default logout route
    pub const LOGOUT: &str = "/logout";
    /// Default unauthorized route
    pub const UNAUTHORIZED: &str = "/unauthorized";
    /// Fixed OAuth redirect-back route
    pub const OAUTH_CALLBACK: &str = "/oauth/callback";
    /// Path parameter naming the project for project-scoped checks
    pub const PROJECT_ID_PARAM: &str = "project_id";
}

/// Cookie names
pub mod cookies {
    /// Session token cookie issued by the identity provider integration
    pub const SESSION: &str = "console_session";
    /// Browser-scoped key for the in-flight OAuth connection
    pub const OAUTH_FLOW: &str = "console_oauth_flow";
}

/// Service identification
pub mod service_names {
    /// Service name used in logs
    pub const TENANT_CONSOLE: &str = "tenant-console";
}

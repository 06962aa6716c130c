// ABOUTME: Authentication context consumed by the route guard and handlers
// ABOUTME: Session predicates, the resolver seam, and session token extraction from requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! # Authentication
//!
//! The console does not issue sessions; the identity provider does. This module turns
//! the provider's token into an [`AuthContext`] and exposes the role predicates the
//! route guard evaluates.

/// HS256 session token validation
pub mod jwt;
/// Session and authentication context types
pub mod session;

pub use jwt::{JwtSessionResolver, SessionClaims, SessionTokenError};
pub use session::{AuthContext, Session};

use crate::constants::cookies;
use crate::permissions::ProjectRole;
use crate::utils::cookies::cookie_value;
use async_trait::async_trait;
use http::{header::AUTHORIZATION, HeaderMap};

/// Role predicates over the caller's session
pub trait SessionContext {
    /// Whether a valid session exists
    fn is_authenticated(&self) -> bool;
    /// Whether session resolution is still in progress
    fn is_loading(&self) -> bool;
    /// Whether the caller is a platform administrator
    fn is_super_admin(&self) -> bool;
    /// Whether the caller owns their tenant
    fn is_tenant_owner(&self) -> bool;
    /// Whether the caller holds exactly `role` in `project_id`
    fn has_project_role(&self, project_id: &str, role: ProjectRole) -> bool;
}

/// Resolves the caller of a request into an [`AuthContext`]
///
/// Resolution never fails: anything that is not a valid session is `Anonymous`.
/// Resolvers backed by state that is not ready yet return `Loading`.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve the caller from request headers
    async fn resolve(&self, headers: &HeaderMap) -> AuthContext;
}

/// Session token from `Authorization: Bearer` or the session cookie
#[must_use]
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned);

    bearer.or_else(|| cookie_value(headers, cookies::SESSION))
}

// ABOUTME: Evaluates declared route roles against a session context
// ABOUTME: OR semantics across roles, fail-closed on unknown tokens and missing project IDs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::{ConsoleRole, ProjectRole};
use crate::auth::{Session, SessionContext};
use crate::errors::{AppError, AppResult};
use std::fmt;

/// A role declared on a route
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequiredRole {
    /// Platform administrator
    SuperAdmin,
    /// Owner of the caller's tenant
    TenantOwner,
    /// Role inside the project named by the route's path parameter
    Project(ProjectRole),
    /// A token outside the vocabulary; never matches
    Unrecognized(String),
}

impl RequiredRole {
    /// Parse a role token; unknown tokens become [`RequiredRole::Unrecognized`]
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if let Ok(role) = token.parse::<ConsoleRole>() {
            return role.into();
        }
        token
            .parse::<ProjectRole>()
            .map_or_else(|_| Self::Unrecognized(token.to_owned()), Self::Project)
    }

    /// Parse a list of role tokens
    #[must_use]
    pub fn from_tokens(tokens: &[&str]) -> Vec<Self> {
        tokens.iter().map(|token| Self::from_token(token)).collect()
    }

    /// The token this role was declared with
    #[must_use]
    pub fn as_token(&self) -> &str {
        match self {
            Self::SuperAdmin => ConsoleRole::SuperAdmin.as_str(),
            Self::TenantOwner => ConsoleRole::TenantOwner.as_str(),
            Self::Project(role) => role.as_str(),
            Self::Unrecognized(token) => token,
        }
    }

    /// Whether evaluating this role needs a project ID
    #[must_use]
    pub const fn is_project_scoped(&self) -> bool {
        matches!(self, Self::Project(_))
    }
}

impl From<ConsoleRole> for RequiredRole {
    fn from(role: ConsoleRole) -> Self {
        match role {
            ConsoleRole::SuperAdmin => Self::SuperAdmin,
            ConsoleRole::TenantOwner => Self::TenantOwner,
        }
    }
}

impl From<ProjectRole> for RequiredRole {
    fn from(role: ProjectRole) -> Self {
        Self::Project(role)
    }
}

impl fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Outcome of a guard evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; render a blocking loading response
    Loading,
    /// Access granted
    Allow,
    /// Not authenticated
    RedirectToLogin,
    /// Authenticated but no declared role matched
    RedirectToUnauthorized,
}

/// Whether a single declared role matches the session
///
/// Project-scoped roles need a non-empty `project_id`; without one they never match.
pub fn role_matches<C>(role: &RequiredRole, ctx: &C, project_id: Option<&str>) -> bool
where
    C: SessionContext + ?Sized,
{
    match role {
        RequiredRole::SuperAdmin => ctx.is_super_admin(),
        RequiredRole::TenantOwner => ctx.is_tenant_owner(),
        RequiredRole::Project(project_role) => project_id
            .filter(|id| !id.is_empty())
            .is_some_and(|id| ctx.has_project_role(id, *project_role)),
        RequiredRole::Unrecognized(_) => false,
    }
}

/// Decide access for a route declaring `required` roles
///
/// Loading wins over everything, then authentication, then any-of role matching.
/// An empty role list admits every authenticated caller.
pub fn evaluate<C>(required: &[RequiredRole], ctx: &C, project_id: Option<&str>) -> GuardDecision
where
    C: SessionContext + ?Sized,
{
    if ctx.is_loading() {
        return GuardDecision::Loading;
    }
    if !ctx.is_authenticated() {
        return GuardDecision::RedirectToLogin;
    }
    if required.is_empty() || required.iter().any(|role| role_matches(role, ctx, project_id)) {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectToUnauthorized
    }
}

/// Ensure the session may act on a tenant's resources
///
/// # Errors
///
/// Returns `PermissionDenied` for tenant owners of another tenant and for callers with
/// neither console role
pub fn ensure_tenant_access(session: &Session, tenant_id: &str) -> AppResult<()> {
    if session.can_manage_tenant(tenant_id) {
        Ok(())
    } else {
        Err(AppError::permission_denied(format!(
            "Access to tenant {tenant_id} is not permitted"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_parses_vocabulary() {
        assert_eq!(RequiredRole::from_token("SUPERADMIN"), RequiredRole::SuperAdmin);
        assert_eq!(
            RequiredRole::from_token("MEMBER"),
            RequiredRole::Project(ProjectRole::Member)
        );
        assert_eq!(
            RequiredRole::from_token("superadmin"),
            RequiredRole::Unrecognized("superadmin".to_owned())
        );
    }

    #[test]
    fn test_token_round_trips_through_display() {
        for token in ["SUPERADMIN", "TENANT_OWNER", "OWNER", "DEPUTY", "MEMBER", "AUDITOR"] {
            assert_eq!(RequiredRole::from_token(token).to_string(), token);
        }
    }
}

// ABOUTME: Resolved caller session and the three-state authentication context
// ABOUTME: Answers the role predicates the route guard and handlers ask about the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::SessionContext;
use crate::permissions::{ConsoleRole, ProjectRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authenticated caller, built from identity-provider claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Identity-provider subject
    pub user_id: String,
    /// Email, when the provider shares it
    #[serde(default)]
    pub email: Option<String>,
    /// Tenant the caller belongs to; superadmins may have none
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// Console-wide roles
    #[serde(default)]
    pub roles: Vec<ConsoleRole>,
    /// Role held in each project, keyed by project ID
    #[serde(default)]
    pub project_roles: BTreeMap<String, ProjectRole>,
    /// Token expiry
    pub expires_at: DateTime<Utc>,
    /// Raw token, forwarded to the backend
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Session {
    /// Whether the caller holds a console-wide role
    #[must_use]
    pub fn has_role(&self, role: ConsoleRole) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the caller may manage the given tenant
    ///
    /// Superadmins manage every tenant; tenant owners only their own.
    #[must_use]
    pub fn can_manage_tenant(&self, tenant_id: &str) -> bool {
        self.has_role(ConsoleRole::SuperAdmin)
            || (self.has_role(ConsoleRole::TenantOwner)
                && self.tenant_id.as_deref() == Some(tenant_id))
    }

    /// Token to forward to the backend
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl SessionContext for Session {
    fn is_authenticated(&self) -> bool {
        true
    }

    fn is_loading(&self) -> bool {
        false
    }

    fn is_super_admin(&self) -> bool {
        self.has_role(ConsoleRole::SuperAdmin)
    }

    fn is_tenant_owner(&self) -> bool {
        self.has_role(ConsoleRole::TenantOwner)
    }

    fn has_project_role(&self, project_id: &str, role: ProjectRole) -> bool {
        self.project_roles.get(project_id) == Some(&role)
    }
}

/// Result of resolving the caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Session resolution has not completed; no decision can be made yet
    Loading,
    /// No valid session
    Anonymous,
    /// Valid session
    Authenticated(Session),
}

impl AuthContext {
    /// The session, when authenticated
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Loading | Self::Anonymous => None,
        }
    }

    /// Consume into the session, when authenticated
    #[must_use]
    pub fn into_session(self) -> Option<Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Loading | Self::Anonymous => None,
        }
    }
}

impl SessionContext for AuthContext {
    fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    fn is_super_admin(&self) -> bool {
        self.session().is_some_and(SessionContext::is_super_admin)
    }

    fn is_tenant_owner(&self) -> bool {
        self.session().is_some_and(SessionContext::is_tenant_owner)
    }

    fn has_project_role(&self, project_id: &str, role: ProjectRole) -> bool {
        self.session()
            .is_some_and(|session| session.has_project_role(project_id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_session() -> Session {
        Session {
            user_id: "user-1".to_owned(),
            email: None,
            tenant_id: Some("t-1".to_owned()),
            roles: vec![ConsoleRole::TenantOwner],
            project_roles: BTreeMap::from([("p-1".to_owned(), ProjectRole::Deputy)]),
            expires_at: Utc::now(),
            access_token: Some("token".to_owned()),
        }
    }

    #[test]
    fn test_project_role_requires_exact_match() {
        let session = owner_session();
        assert!(session.has_project_role("p-1", ProjectRole::Deputy));
        assert!(!session.has_project_role("p-1", ProjectRole::Owner));
        assert!(!session.has_project_role("p-1", ProjectRole::Member));
        assert!(!session.has_project_role("p-2", ProjectRole::Deputy));
    }

    #[test]
    fn test_tenant_owner_limited_to_own_tenant() {
        let session = owner_session();
        assert!(session.can_manage_tenant("t-1"));
        assert!(!session.can_manage_tenant("t-2"));
    }

    #[test]
    fn test_non_authenticated_contexts_hold_no_roles() {
        for ctx in [AuthContext::Loading, AuthContext::Anonymous] {
            assert!(!ctx.is_authenticated());
            assert!(!ctx.is_super_admin());
            assert!(!ctx.has_project_role("p-1", ProjectRole::Owner));
        }
        assert!(AuthContext::Loading.is_loading());
    }

    #[test]
    fn test_access_token_not_serialized() {
        let json = serde_json::to_string(&owner_session()).unwrap();
        assert!(!json.contains("accessToken"));
        assert!(json.contains("\"tenantId\":\"t-1\""));
    }
}

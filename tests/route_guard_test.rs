// ABOUTME: Tests for route guard evaluation over every role and session combination
// ABOUTME: Any-of matching, fail-closed unknown tokens, and project-scoped denial without a project
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::BTreeMap;
use tenant_console::auth::{AuthContext, SessionContext};
use tenant_console::permissions::{
    ensure_tenant_access, evaluate, role_matches, GuardDecision, ProjectRole, RequiredRole,
};

mod helpers;
use helpers::sessions::TokenBuilder;

/// Session state as plain flags, to enumerate combinations
#[derive(Debug, Clone)]
struct RoleState {
    authenticated: bool,
    loading: bool,
    super_admin: bool,
    tenant_owner: bool,
    project_roles: BTreeMap<String, ProjectRole>,
}

impl SessionContext for RoleState {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_super_admin(&self) -> bool {
        self.super_admin
    }

    fn is_tenant_owner(&self) -> bool {
        self.tenant_owner
    }

    fn has_project_role(&self, project_id: &str, role: ProjectRole) -> bool {
        self.project_roles.get(project_id) == Some(&role)
    }
}

fn all_role_states() -> Vec<RoleState> {
    let project_options: [Option<ProjectRole>; 4] = [
        None,
        Some(ProjectRole::Owner),
        Some(ProjectRole::Deputy),
        Some(ProjectRole::Member),
    ];
    let mut states = Vec::new();
    for super_admin in [false, true] {
        for tenant_owner in [false, true] {
            for project_role in project_options {
                let mut project_roles = BTreeMap::new();
                if let Some(role) = project_role {
                    project_roles.insert("p-1".to_owned(), role);
                }
                states.push(RoleState {
                    authenticated: true,
                    loading: false,
                    super_admin,
                    tenant_owner,
                    project_roles,
                });
            }
        }
    }
    states
}

fn all_required_sets() -> Vec<Vec<RequiredRole>> {
    let vocabulary = ["SUPERADMIN", "TENANT_OWNER", "OWNER", "DEPUTY", "MEMBER", "ADMIN"];
    // Every non-empty subset of the vocabulary
    (1_u32..(1 << vocabulary.len()))
        .map(|mask| {
            vocabulary
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, token)| RequiredRole::from_token(token))
                .collect()
        })
        .collect()
}

#[test]
fn test_access_granted_iff_any_role_matches() {
    for required in all_required_sets() {
        for state in all_role_states() {
            for project_id in [None, Some("p-1"), Some("p-other")] {
                let any_match = required
                    .iter()
                    .any(|role| role_matches(role, &state, project_id));
                let decision = evaluate(&required, &state, project_id);
                assert_eq!(
                    decision == GuardDecision::Allow,
                    any_match,
                    "required={required:?} state={state:?} project={project_id:?}"
                );
                if !any_match {
                    assert_eq!(decision, GuardDecision::RedirectToUnauthorized);
                }
            }
        }
    }
}

#[test]
fn test_unrecognized_tokens_never_match() {
    for token in ["ADMIN", "owner", "", "SUPERADMIN ", "TENANT-OWNER"] {
        let role = RequiredRole::from_token(token);
        assert!(matches!(role, RequiredRole::Unrecognized(_)), "{token:?}");
        for state in all_role_states() {
            for project_id in [None, Some("p-1")] {
                assert!(!role_matches(&role, &state, project_id));
            }
        }
    }
}

#[test]
fn test_project_role_without_project_id_denies() {
    for state in all_role_states() {
        for role in [ProjectRole::Owner, ProjectRole::Deputy, ProjectRole::Member] {
            let required = RequiredRole::Project(role);
            assert!(!role_matches(&required, &state, None));
            assert!(!role_matches(&required, &state, Some("")));
        }
    }
}

#[test]
fn test_owner_route_without_project_redirects_to_unauthorized() {
    let session = TokenBuilder::new("u-1").project_role("p-1", "OWNER").session();
    let ctx = AuthContext::Authenticated(session);
    let required = RequiredRole::from_tokens(&["OWNER"]);

    assert_eq!(
        evaluate(&required, &ctx, None),
        GuardDecision::RedirectToUnauthorized
    );
    assert_eq!(evaluate(&required, &ctx, Some("p-1")), GuardDecision::Allow);
}

#[test]
fn test_project_roles_do_not_imply_each_other() {
    let session = TokenBuilder::new("u-1").project_role("p-1", "OWNER").session();
    let ctx = AuthContext::Authenticated(session);
    let deputy = RequiredRole::from_tokens(&["DEPUTY"]);
    assert_eq!(
        evaluate(&deputy, &ctx, Some("p-1")),
        GuardDecision::RedirectToUnauthorized
    );
}

#[test]
fn test_loading_takes_precedence() {
    let required = RequiredRole::from_tokens(&["SUPERADMIN"]);
    assert_eq!(
        evaluate(&required, &AuthContext::Loading, None),
        GuardDecision::Loading
    );
    let mut state = all_role_states().pop().unwrap();
    state.loading = true;
    assert_eq!(evaluate(&required, &state, None), GuardDecision::Loading);
}

#[test]
fn test_unauthenticated_redirects_to_login_regardless_of_roles() {
    for required in all_required_sets() {
        assert_eq!(
            evaluate(&required, &AuthContext::Anonymous, Some("p-1")),
            GuardDecision::RedirectToLogin
        );
    }
    assert_eq!(
        evaluate(&[], &AuthContext::Anonymous, None),
        GuardDecision::RedirectToLogin
    );
}

#[test]
fn test_empty_requirement_admits_any_session() {
    let ctx = AuthContext::Authenticated(TokenBuilder::new("u-plain").session());
    assert_eq!(evaluate(&[], &ctx, None), GuardDecision::Allow);
}

#[test]
fn test_tenant_access_scoping() {
    let owner = TokenBuilder::tenant_owner("u-owner", "t-1").session();
    assert!(ensure_tenant_access(&owner, "t-1").is_ok());
    let denied = ensure_tenant_access(&owner, "t-2").unwrap_err();
    assert_eq!(denied.http_status(), 403);

    let admin = TokenBuilder::superadmin("u-admin").session();
    assert!(ensure_tenant_access(&admin, "t-2").is_ok());

    let member = TokenBuilder::new("u-member")
        .tenant("t-1")
        .project_role("p-1", "MEMBER")
        .session();
    assert!(ensure_tenant_access(&member, "t-1").is_err());
}

// ABOUTME: Session fixtures for integration tests
// ABOUTME: Signed test tokens, fixed-answer session resolvers, and console contexts

use async_trait::async_trait;
use chrono::Utc;
use http::HeaderMap;
use std::collections::HashMap;
use std::sync::Arc;
use tenant_console::auth::{AuthContext, Session, SessionClaims, SessionResolver};
use tenant_console::config::environment::{ConsoleConfig, IdentityConfig};
use tenant_console::context::AppContext;
use tenant_console::oauth2_client::{BackendTokenExchanger, InMemoryFlowStateStore};

/// HS256 secret shared by test tokens and the test configuration
pub const TEST_SECRET: &str = "console-test-secret-0123456789abcdef";

/// Public URL of the console under test
pub const PUBLIC_URL: &str = "http://console.test";

/// Builds signed session tokens
#[derive(Clone)]
pub struct TokenBuilder {
    claims: SessionClaims,
}

impl TokenBuilder {
    /// Session for `user_id`, valid for an hour
    pub fn new(user_id: &str) -> Self {
        let now = Utc::now().timestamp();
        Self {
            claims: SessionClaims {
                sub: user_id.to_owned(),
                email: Some(format!("{user_id}@example.com")),
                tenant_id: None,
                roles: Vec::new(),
                project_roles: HashMap::new(),
                exp: now + 3600,
                iat: Some(now),
                aud: None,
            },
        }
    }

    /// Platform administrator
    pub fn superadmin(user_id: &str) -> Self {
        Self::new(user_id).role("SUPERADMIN")
    }

    /// Owner of `tenant_id`
    pub fn tenant_owner(user_id: &str, tenant_id: &str) -> Self {
        Self::new(user_id).tenant(tenant_id).role("TENANT_OWNER")
    }

    /// Add a console role token
    pub fn role(mut self, role: &str) -> Self {
        self.claims.roles.push(role.to_owned());
        self
    }

    /// Bind to a tenant
    pub fn tenant(mut self, tenant_id: &str) -> Self {
        self.claims.tenant_id = Some(tenant_id.to_owned());
        self
    }

    /// Grant a project role token
    pub fn project_role(mut self, project_id: &str, role: &str) -> Self {
        self.claims
            .project_roles
            .insert(project_id.to_owned(), role.to_owned());
        self
    }

    /// Set the audience claim
    pub fn audience(mut self, audience: &str) -> Self {
        self.claims.aud = Some(audience.to_owned());
        self
    }

    /// Expire `seconds` ago
    pub fn expired(mut self, seconds: i64) -> Self {
        self.claims.exp = Utc::now().timestamp() - seconds;
        self
    }

    /// Claims as built
    pub fn claims(&self) -> SessionClaims {
        self.claims.clone()
    }

    /// Signed token
    pub fn token(&self) -> String {
        self.claims.encode(TEST_SECRET.as_bytes()).unwrap()
    }

    /// Session as the resolver would produce it
    pub fn session(&self) -> Session {
        self.claims.clone().into_session(self.token())
    }
}

/// Resolver answering the same context for every request
pub struct StaticResolver(pub AuthContext);

#[async_trait]
impl SessionResolver for StaticResolver {
    async fn resolve(&self, _headers: &HeaderMap) -> AuthContext {
        self.0.clone()
    }
}

/// Configuration pointing at `backend_url`
pub fn test_config(backend_url: &str) -> ConsoleConfig {
    ConsoleConfig::new(
        backend_url,
        PUBLIC_URL,
        IdentityConfig::new(
            TEST_SECRET,
            "http://idp.test/login",
            "http://idp.test/logout",
        ),
    )
}

/// Production wiring with JWT sessions
pub fn jwt_context(backend_url: &str) -> Arc<AppContext> {
    Arc::new(AppContext::from_config(test_config(backend_url)).unwrap())
}

/// Context answering every request with `auth`
pub fn static_context(backend_url: &str, auth: AuthContext) -> Arc<AppContext> {
    Arc::new(AppContext::with_components(
        test_config(backend_url),
        Arc::new(StaticResolver(auth)),
        Arc::new(InMemoryFlowStateStore::new()),
        Arc::new(BackendTokenExchanger::new(backend_url)),
    ))
}

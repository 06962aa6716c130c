// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a validated, strongly typed console configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! Environment-based configuration for the console service

use crate::constants::{defaults, env_keys, oauth, routes};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }

    /// Directive string understood by `EnvFilter`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment
    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Identity provider settings
#[derive(Clone)]
pub struct IdentityConfig {
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
    /// Expected `aud` claim, if the provider sets one
    pub audience: Option<String>,
    /// Identity provider login page
    pub login_url: String,
    /// Identity provider logout page
    pub logout_url: String,
}

impl IdentityConfig {
    /// Create identity settings without an audience restriction
    pub fn new(
        jwt_secret: impl Into<String>,
        login_url: impl Into<String>,
        logout_url: impl Into<String>,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            audience: None,
            login_url: login_url.into(),
            logout_url: logout_url.into(),
        }
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("audience", &self.audience)
            .field("login_url", &self.login_url)
            .field("logout_url", &self.logout_url)
            .finish()
    }
}

/// Console routes the guard redirects to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Where unauthenticated callers are sent
    pub login: String,
    /// Where callers lacking a required role are sent
    pub unauthorized: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            login: routes::LOGIN.to_owned(),
            unauthorized: routes::UNAUTHORIZED.to_owned(),
        }
    }
}

/// OAuth connection flow behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OAuthFlowConfig {
    /// Freshness window of the OAuth state, in seconds
    pub state_ttl_secs: u64,
    /// Accept the legacy `<integrationId>:<nonce>` callback state
    pub allow_legacy_state: bool,
}

impl Default for OAuthFlowConfig {
    fn default() -> Self {
        Self {
            state_ttl_secs: oauth::DEFAULT_STATE_TTL_SECS,
            allow_legacy_state: true,
        }
    }
}

impl OAuthFlowConfig {
    /// Freshness window as a `Duration`
    #[must_use]
    pub const fn state_ttl(&self) -> Duration {
        Duration::from_secs(self.state_ttl_secs)
    }

    /// How long an abandoned flow is kept before purging, a multiple of the freshness window
    #[must_use]
    pub const fn flow_retention(&self) -> Duration {
        let retention_secs = self
            .state_ttl_secs
            .saturating_mul(oauth::FLOW_RETENTION_TTL_MULTIPLIER);
        Duration::from_secs(retention_secs)
    }
}

/// Complete console configuration
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Default log level
    pub log_level: LogLevel,
    /// Base URL of the REST backend, without trailing slash
    pub backend_api_url: String,
    /// Externally visible base URL of this console, without trailing slash
    pub public_base_url: String,
    /// Identity provider settings
    pub identity: IdentityConfig,
    /// Guard redirect targets
    pub routes: RouteConfig,
    /// OAuth flow behavior
    pub oauth: OAuthFlowConfig,
}

impl ConsoleConfig {
    /// Build a configuration with defaults for everything but the collaborators
    pub fn new(
        backend_api_url: impl Into<String>,
        public_base_url: impl Into<String>,
        identity: IdentityConfig,
    ) -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            environment: Environment::default(),
            log_level: LogLevel::default(),
            backend_api_url: trim_base_url(&backend_api_url.into()),
            public_base_url: trim_base_url(&public_base_url.into()),
            identity,
            routes: RouteConfig::default(),
            oauth: OAuthFlowConfig::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails to parse
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        let public_base_url = env_var_or(env_keys::PUBLIC_BASE_URL, defaults::PUBLIC_BASE_URL);
        let jwt_secret = env::var(env_keys::SESSION_JWT_SECRET)
            .with_context(|| format!("{} must be set", env_keys::SESSION_JWT_SECRET))?;

        let config = Self {
            http_port: env_var_or(env_keys::HTTP_PORT, &defaults::HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment: Environment::from_str_or_default(&env_var_or(
                env_keys::ENVIRONMENT,
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&env_var_or(env_keys::LOG_LEVEL, "info")),
            backend_api_url: trim_base_url(&env_var_or(
                env_keys::BACKEND_API_URL,
                defaults::BACKEND_API_URL,
            )),
            identity: IdentityConfig {
                jwt_secret,
                audience: env::var(env_keys::SESSION_JWT_AUDIENCE)
                    .ok()
                    .filter(|aud| !aud.is_empty()),
                login_url: env_var_or(
                    env_keys::IDP_LOGIN_URL,
                    &format!("{}/auth/login", trim_base_url(&public_base_url)),
                ),
                logout_url: env_var_or(
                    env_keys::IDP_LOGOUT_URL,
                    &format!("{}/auth/logout", trim_base_url(&public_base_url)),
                ),
            },
            public_base_url: trim_base_url(&public_base_url),
            routes: RouteConfig {
                login: env_var_or(env_keys::LOGIN_ROUTE, routes::LOGIN),
                unauthorized: env_var_or(env_keys::UNAUTHORIZED_ROUTE, routes::UNAUTHORIZED),
            },
            oauth: OAuthFlowConfig {
                state_ttl_secs: env_var_or(
                    env_keys::OAUTH_STATE_TTL_SECS,
                    &oauth::DEFAULT_STATE_TTL_SECS.to_string(),
                )
                .parse()
                .context("Invalid OAUTH_STATE_TTL_SECS value")?,
                allow_legacy_state: parse_bool(&env_var_or(
                    env_keys::OAUTH_ALLOW_LEGACY_STATE,
                    "true",
                ))
                .context("Invalid OAUTH_ALLOW_LEGACY_STATE value")?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            bail!("HTTP_PORT must be non-zero");
        }

        Url::parse(&self.backend_api_url)
            .map_err(|e| anyhow!("BACKEND_API_URL is not a valid URL: {e}"))?;
        let public = Url::parse(&self.public_base_url)
            .map_err(|e| anyhow!("PUBLIC_BASE_URL is not a valid URL: {e}"))?;
        Url::parse(&self.identity.login_url)
            .map_err(|e| anyhow!("IDP_LOGIN_URL is not a valid URL: {e}"))?;
        Url::parse(&self.identity.logout_url)
            .map_err(|e| anyhow!("IDP_LOGOUT_URL is not a valid URL: {e}"))?;

        if self.identity.jwt_secret.len() < defaults::MIN_JWT_SECRET_LENGTH {
            bail!(
                "SESSION_JWT_SECRET must be at least {} bytes",
                defaults::MIN_JWT_SECRET_LENGTH
            );
        }

        for (key, route) in [
            (env_keys::LOGIN_ROUTE, &self.routes.login),
            (env_keys::UNAUTHORIZED_ROUTE, &self.routes.unauthorized),
        ] {
            if !route.starts_with('/') {
                bail!("{key} must be an absolute path, got '{route}'");
            }
        }

        if self.oauth.state_ttl_secs == 0 {
            bail!("OAUTH_STATE_TTL_SECS must be greater than zero");
        }

        if self.environment.is_production() {
            if public.scheme() != "https" {
                bail!("PUBLIC_BASE_URL must use https in production");
            }
            if self.oauth.allow_legacy_state {
                warn!("Legacy OAuth state format is accepted in production");
            }
        }

        Ok(())
    }

    /// Fixed redirect URI registered with every cloud provider
    #[must_use]
    pub fn oauth_redirect_uri(&self) -> String {
        format!("{}{}", self.public_base_url, routes::OAUTH_CALLBACK)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Tenant Console Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Backend API: {}\n\
             - Public URL: {}\n\
             - OAuth Redirect URI: {}\n\
             - OAuth State TTL: {}s\n\
             - Legacy OAuth State: {}",
            self.http_port,
            self.environment,
            self.log_level,
            self.backend_api_url,
            self.public_base_url,
            self.oauth_redirect_uri(),
            self.oauth.state_ttl_secs,
            if self.oauth.allow_legacy_state {
                "Accepted"
            } else {
                "Rejected"
            },
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected a boolean, got '{other}'")),
    }
}

// ABOUTME: HS256 session token validation against the identity provider's shared secret
// ABOUTME: Converts validated claims into a Session; invalid tokens resolve to Anonymous
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::{extract_session_token, AuthContext, Session, SessionResolver};
use crate::config::environment::IdentityConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::permissions::{ConsoleRole, ProjectRole};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::HeaderMap;
use jsonwebtoken::{
    decode, encode,
    errors::{Error as JwtError, ErrorKind},
    Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

/// Claims carried by a console session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Tenant the user belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Console-wide role tokens
    #[serde(default)]
    pub roles: Vec<String>,
    /// Project ID to project role token
    #[serde(default)]
    pub project_roles: HashMap<String, String>,
    /// Expiration (seconds since epoch)
    pub exp: i64,
    /// Issued at (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl SessionClaims {
    /// Sign the claims with an HS256 secret
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails
    pub fn encode(&self, secret: &[u8]) -> AppResult<String> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| AppError::internal(format!("Failed to sign session token: {e}")))
    }

    /// Build a session from validated claims
    ///
    /// Role tokens outside the known vocabulary are dropped; the guard fails closed on
    /// them anyway.
    #[must_use]
    pub fn into_session(self, access_token: String) -> Session {
        let roles = self
            .roles
            .iter()
            .filter_map(|token| match token.parse::<ConsoleRole>() {
                Ok(role) => Some(role),
                Err(e) => {
                    debug!(user.id = %self.sub, "Ignoring console role claim: {e}");
                    None
                }
            })
            .collect();

        let project_roles: BTreeMap<String, ProjectRole> = self
            .project_roles
            .iter()
            .filter_map(|(project_id, token)| match token.parse::<ProjectRole>() {
                Ok(role) => Some((project_id.clone(), role)),
                Err(e) => {
                    debug!(user.id = %self.sub, project.id = %project_id, "Ignoring project role claim: {e}");
                    None
                }
            })
            .collect();

        Session {
            expires_at: DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now),
            user_id: self.sub,
            email: self.email,
            tenant_id: self.tenant_id,
            roles,
            project_roles,
            access_token: Some(access_token),
        }
    }
}

/// Why a session token was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionTokenError {
    /// Token has expired
    #[error("session token has expired")]
    Expired,
    /// Signature, audience, or claims are invalid
    #[error("session token is invalid: {reason}")]
    Invalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is not a well-formed JWT
    #[error("session token is malformed: {details}")]
    Malformed {
        /// Details about malformation
        details: String,
    },
}

impl From<SessionTokenError> for AppError {
    fn from(error: SessionTokenError) -> Self {
        match error {
            SessionTokenError::Expired => {
                Self::new(ErrorCode::AuthExpired, error.to_string())
            }
            SessionTokenError::Invalid { .. } | SessionTokenError::Malformed { .. } => {
                Self::auth_invalid(error.to_string())
            }
        }
    }
}

/// Validates HS256 session tokens issued by the identity provider
pub struct JwtSessionResolver {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionResolver {
    /// Create a resolver for the given secret and optional audience
    #[must_use]
    pub fn new(secret: &[u8], audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Create a resolver from identity configuration
    #[must_use]
    pub fn from_config(identity: &IdentityConfig) -> Self {
        Self::new(identity.jwt_secret.as_bytes(), identity.audience.as_deref())
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`SessionTokenError`] if the token is expired, badly signed, or malformed
    pub fn validate(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| convert_jwt_error(&e))
    }
}

fn convert_jwt_error(e: &JwtError) -> SessionTokenError {
    match e.kind() {
        ErrorKind::ExpiredSignature => SessionTokenError::Expired,
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::ImmatureSignature => SessionTokenError::Invalid {
            reason: e.to_string(),
        },
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            SessionTokenError::Malformed {
                details: e.to_string(),
            }
        }
        _ => SessionTokenError::Invalid {
            reason: e.to_string(),
        },
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> AuthContext {
        let Some(token) = extract_session_token(headers) else {
            return AuthContext::Anonymous;
        };

        match self.validate(&token) {
            Ok(claims) => AuthContext::Authenticated(claims.into_session(token)),
            Err(e) => {
                debug!("Rejected session token: {e}");
                AuthContext::Anonymous
            }
        }
    }
}

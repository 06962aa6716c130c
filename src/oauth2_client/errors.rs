// ABOUTME: OAuth connection flow error taxonomy with human-readable messages
// ABOUTME: Provider-reported codes, locally detected protocol violations, and exchange failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use crate::errors::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of an `OAuth` flow failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthErrorKind {
    // RFC 6749 codes reported by the provider or the backend exchange
    /// Malformed authorization request
    InvalidRequest,
    /// Client authentication failed
    InvalidClient,
    /// Authorization code invalid, revoked, or redeemed
    InvalidGrant,
    /// Client not allowed to use this grant
    UnauthorizedClient,
    /// Grant type not supported
    UnsupportedGrantType,
    /// Requested scope rejected
    InvalidScope,
    /// User or provider denied the request
    AccessDenied,
    /// Provider internal failure
    ServerError,
    /// Provider overloaded or in maintenance
    TemporarilyUnavailable,

    // Detected by the console
    /// Returned state does not correlate with the pending flow
    StateMismatch,
    /// Pending flow is older than the freshness window
    StateExpired,
    /// Authorization code expired before exchange
    CodeExpired,
    /// Stored verifier does not produce the stored challenge
    PkceVerificationFailed,
    /// `code` or `state` absent from the callback
    MissingParameters,
    /// `state` could not be decoded
    InvalidState,
    /// Backend exchange failed
    ExchangeFailed,
    /// Anything else
    Unknown,
}

impl OAuthErrorKind {
    /// Wire code of this kind
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::InvalidScope => "invalid_scope",
            Self::AccessDenied => "access_denied",
            Self::ServerError => "server_error",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
            Self::StateMismatch => "state_mismatch",
            Self::StateExpired => "state_expired",
            Self::CodeExpired => "code_expired",
            Self::PkceVerificationFailed => "pkce_verification_failed",
            Self::MissingParameters => "missing_parameters",
            Self::InvalidState => "invalid_state",
            Self::ExchangeFailed => "exchange_failed",
            Self::Unknown => "unknown",
        }
    }

    /// Classify a wire code; unrecognized codes become [`OAuthErrorKind::Unknown`]
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "invalid_request" => Self::InvalidRequest,
            "invalid_client" => Self::InvalidClient,
            "invalid_grant" => Self::InvalidGrant,
            "unauthorized_client" => Self::UnauthorizedClient,
            "unsupported_grant_type" => Self::UnsupportedGrantType,
            "invalid_scope" => Self::InvalidScope,
            "access_denied" => Self::AccessDenied,
            "server_error" => Self::ServerError,
            "temporarily_unavailable" => Self::TemporarilyUnavailable,
            "state_mismatch" => Self::StateMismatch,
            "state_expired" => Self::StateExpired,
            "code_expired" => Self::CodeExpired,
            "pkce_verification_failed" => Self::PkceVerificationFailed,
            "missing_parameters" => Self::MissingParameters,
            "invalid_state" => Self::InvalidState,
            "exchange_failed" => Self::ExchangeFailed,
            _ => Self::Unknown,
        }
    }

    /// Human-readable message shown to the user
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "The authorization request was invalid",
            Self::InvalidClient => "The provider did not recognize this application",
            Self::InvalidGrant => "The authorization grant is invalid or was already used",
            Self::UnauthorizedClient => "This application is not authorized for the requested grant",
            Self::UnsupportedGrantType => "The provider does not support this grant type",
            Self::InvalidScope => "The requested permissions were rejected by the provider",
            Self::AccessDenied => "Access was denied by the user or the provider",
            Self::ServerError => "The provider encountered an internal error",
            Self::TemporarilyUnavailable => "The provider is temporarily unavailable",
            Self::StateMismatch => "OAuth state does not match the pending connection request",
            Self::StateExpired => "The connection request has expired; please start again",
            Self::CodeExpired => "The authorization code has expired",
            Self::PkceVerificationFailed => "PKCE verification failed",
            Self::MissingParameters => "missing required OAuth parameters",
            Self::InvalidState => "invalid OAuth state parameter",
            Self::ExchangeFailed => "Token exchange failed",
            Self::Unknown => "An unknown OAuth error occurred",
        }
    }

    /// Whether the provider (rather than the console) reported this error
    #[must_use]
    pub const fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest
                | Self::InvalidClient
                | Self::InvalidGrant
                | Self::UnauthorizedClient
                | Self::UnsupportedGrantType
                | Self::InvalidScope
                | Self::AccessDenied
                | Self::ServerError
                | Self::TemporarilyUnavailable
        )
    }
}

impl fmt::Display for OAuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of an `OAuth` connection flow
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct OAuthError {
    /// Classification
    pub kind: OAuthErrorKind,
    /// Human-readable message
    pub message: String,
    /// Additional detail, e.g. the provider's `error_description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OAuthError {
    /// Error with the kind's standard message
    #[must_use]
    pub fn new(kind: OAuthErrorKind) -> Self {
        Self {
            kind,
            message: kind.message().to_owned(),
            description: None,
        }
    }

    /// Attach detail
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Error reported through the callback's `error` and `error_description` parameters
    #[must_use]
    pub fn from_provider(code: &str, description: Option<&str>) -> Self {
        let error = Self::new(OAuthErrorKind::from_code(code));
        match description.filter(|d| !d.is_empty()) {
            Some(description) => error.with_description(description),
            None => error,
        }
    }

    /// Message followed by the description, when present
    #[must_use]
    pub fn display_message(&self) -> String {
        self.description.as_ref().map_or_else(
            || self.message.clone(),
            |description| format!("{}: {description}", self.message),
        )
    }
}

impl From<OAuthError> for AppError {
    fn from(error: OAuthError) -> Self {
        let code = match error.kind {
            OAuthErrorKind::MissingParameters => ErrorCode::MissingRequiredField,
            OAuthErrorKind::InvalidState
            | OAuthErrorKind::StateMismatch
            | OAuthErrorKind::StateExpired => ErrorCode::InvalidInput,
            OAuthErrorKind::PkceVerificationFailed => ErrorCode::AuthInvalid,
            OAuthErrorKind::ExchangeFailed | OAuthErrorKind::Unknown => {
                ErrorCode::ExternalServiceError
            }
            _ => ErrorCode::ExternalAuthFailed,
        };
        Self::new(code, error.display_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_codes_round_trip() {
        for kind in [
            OAuthErrorKind::AccessDenied,
            OAuthErrorKind::InvalidGrant,
            OAuthErrorKind::TemporarilyUnavailable,
            OAuthErrorKind::PkceVerificationFailed,
        ] {
            assert_eq!(OAuthErrorKind::from_code(kind.as_str()), kind);
        }
        assert_eq!(
            OAuthErrorKind::from_code("something_new"),
            OAuthErrorKind::Unknown
        );
    }

    #[test]
    fn test_from_provider_keeps_description() {
        let error = OAuthError::from_provider("access_denied", Some("User cancelled"));
        assert_eq!(error.kind, OAuthErrorKind::AccessDenied);
        assert_eq!(
            error.display_message(),
            "Access was denied by the user or the provider: User cancelled"
        );
    }

    #[test]
    fn test_serde_uses_snake_case_codes() {
        let json = serde_json::to_string(&OAuthError::new(OAuthErrorKind::StateMismatch)).unwrap();
        assert!(json.contains("\"kind\":\"state_mismatch\""));
    }
}

// ABOUTME: OAuth state token carrying CSRF and PKCE context across the provider redirect
// ABOUTME: Full token for local persistence, verifier-free form for the redirect, legacy parser
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! # OAuth State
//!
//! Two encodings of the same context exist:
//!
//! - [`OAuthStateToken`] is the complete record, including the PKCE verifier. It is
//!   persisted locally before the redirect and read back on the callback.
//! - [`RedirectState`] is what travels through the provider as the `state` query
//!   parameter. It carries the nonce and identifiers but never the verifier.
//!
//! Both are camelCase JSON encoded as unpadded base64url.

use crate::constants::oauth::{LEGACY_NONCE_MIN_LENGTH, NONCE_BYTES, STATE_CLOCK_SKEW_MS};
use crate::errors::{AppError, AppResult, ErrorCode};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use rand::RngCore;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

/// Complete `OAuth` flow context persisted between redirect and callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthStateToken {
    /// Integration being connected
    pub integration_id: String,
    /// Tenant owning the integration
    pub tenant_id: String,
    /// Single-use CSRF nonce
    pub nonce: String,
    /// PKCE verifier
    pub code_verifier: String,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// User who started the flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl OAuthStateToken {
    /// Create a token with a fresh nonce, stamped now
    #[must_use]
    pub fn new(
        integration_id: impl Into<String>,
        tenant_id: impl Into<String>,
        code_verifier: impl Into<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            integration_id: integration_id.into(),
            tenant_id: tenant_id.into(),
            nonce: Self::generate_nonce(),
            code_verifier: code_verifier.into(),
            timestamp: Utc::now().timestamp_millis(),
            user_id,
        }
    }

    /// Cryptographically random nonce, base64url encoded
    #[must_use]
    pub fn generate_nonce() -> String {
        let mut bytes = [0_u8; NONCE_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Encode the full token, verifier included
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON encoding fails
    pub fn serialize(&self) -> AppResult<String> {
        encode_json(self)
    }

    /// Decode a token produced by [`OAuthStateToken::serialize`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the input is not a valid encoded token
    pub fn deserialize(encoded: &str) -> AppResult<Self> {
        decode_json(encoded)
    }

    /// The verifier-free form sent as the redirect `state` parameter
    #[must_use]
    pub fn redirect_state(&self) -> RedirectState {
        RedirectState {
            integration_id: self.integration_id.clone(),
            tenant_id: self.tenant_id.clone(),
            nonce: self.nonce.clone(),
            timestamp: self.timestamp,
        }
    }

    /// Encoded redirect `state` parameter
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON encoding fails
    pub fn redirect_param(&self) -> AppResult<String> {
        self.redirect_state().encode()
    }

    /// Whether the token is within `ttl` of `now_ms`
    ///
    /// Timestamps slightly in the future are tolerated to absorb clock skew.
    #[must_use]
    pub fn is_fresh_at(&self, now_ms: i64, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let age_ms = now_ms.saturating_sub(self.timestamp);
        age_ms >= -STATE_CLOCK_SKEW_MS && age_ms <= ttl_ms
    }

    /// Whether the token is within `ttl` of the current time
    #[must_use]
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.is_fresh_at(Utc::now().timestamp_millis(), ttl)
    }
}

/// `state` query parameter round-tripped through the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectState {
    /// Integration being connected
    pub integration_id: String,
    /// Tenant owning the integration
    pub tenant_id: String,
    /// CSRF nonce
    pub nonce: String,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl RedirectState {
    /// Encode as unpadded base64url JSON
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON encoding fails
    pub fn encode(&self) -> AppResult<String> {
        encode_json(self)
    }

    /// Decode the `state` parameter
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the parameter is not a structured state
    pub fn parse(encoded: &str) -> AppResult<Self> {
        let state: Self = decode_json(encoded)?;
        if state.nonce.is_empty() || state.integration_id.is_empty() || state.tenant_id.is_empty()
        {
            return Err(AppError::new(
                ErrorCode::InvalidFormat,
                "OAuth state is missing required fields",
            ));
        }
        Ok(state)
    }
}

/// Pre-token callback state: `<integrationId>:<nonce>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyState {
    /// Integration being connected
    pub integration_id: String,
    /// CSRF nonce
    pub nonce: String,
}

impl LegacyState {
    /// Parse the legacy format; `None` if the input does not look like one
    #[must_use]
    pub fn parse(state: &str) -> Option<Self> {
        let (integration_id, nonce) = state.split_once(':')?;
        let valid_id = !integration_id.is_empty() && integration_id.chars().all(is_legacy_char);
        let valid_nonce =
            nonce.len() >= LEGACY_NONCE_MIN_LENGTH && nonce.chars().all(is_legacy_char);
        (valid_id && valid_nonce).then(|| Self {
            integration_id: integration_id.to_owned(),
            nonce: nonce.to_owned(),
        })
    }
}

fn is_legacy_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn encode_json<T: Serialize>(value: &T) -> AppResult<String> {
    let json = serde_json::to_vec(value)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_json<T: DeserializeOwned>(encoded: &str) -> AppResult<T> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded.trim()).map_err(|e| {
        AppError::new(
            ErrorCode::InvalidFormat,
            format!("OAuth state is not base64url: {e}"),
        )
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        AppError::new(
            ErrorCode::InvalidFormat,
            format!("OAuth state is not valid JSON: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_is_unique_and_url_safe() {
        let a = OAuthStateToken::generate_nonce();
        let b = OAuthStateToken::generate_nonce();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(is_legacy_char));
    }

    #[test]
    fn test_legacy_parse_rejects_short_nonce() {
        assert!(LegacyState::parse("int-1:short").is_none());
        assert!(LegacyState::parse("int-1").is_none());
        assert!(LegacyState::parse(":abcdefghijklmnopq").is_none());
        assert_eq!(
            LegacyState::parse("int-1:abcdefghijklmnop"),
            Some(LegacyState {
                integration_id: "int-1".to_owned(),
                nonce: "abcdefghijklmnop".to_owned(),
            })
        );
    }

    #[test]
    fn test_freshness_window_edges() {
        let mut token = OAuthStateToken::new("int-1", "t-1", "v".repeat(43), None);
        token.timestamp = 1_000_000;
        let ttl = Duration::from_secs(600);
        assert!(token.is_fresh_at(1_000_000 + 600_000, ttl));
        assert!(!token.is_fresh_at(1_000_000 + 600_001, ttl));
        assert!(token.is_fresh_at(1_000_000 - 30_000, ttl));
        assert!(!token.is_fresh_at(1_000_000 - 30_001, ttl));
    }
}

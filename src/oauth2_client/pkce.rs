// ABOUTME: PKCE (RFC 7636) code verifier generation and S256 challenge derivation
// ABOUTME: Verifies verifier/challenge pairs in constant time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use crate::constants::oauth::{
    CODE_CHALLENGE_METHOD, CODE_VERIFIER_LENGTH, CODE_VERIFIER_MAX_LENGTH,
    CODE_VERIFIER_MIN_LENGTH,
};
use crate::errors::{AppError, AppResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// RFC 7636 unreserved characters
const VERIFIER_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// `PKCE` parameters for an `OAuth` authorization request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceParams {
    /// Randomly generated code verifier (43-128 characters); never sent in the redirect
    pub code_verifier: String,
    /// SHA256 hash of code verifier, base64url encoded
    pub code_challenge: String,
    /// Challenge method (always "S256")
    pub code_challenge_method: &'static str,
}

impl PkceParams {
    /// Generate `PKCE` parameters with `S256` challenge method
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code_verifier: String = (0..CODE_VERIFIER_LENGTH)
            .map(|_| char::from(VERIFIER_CHARS[rng.gen_range(0..VERIFIER_CHARS.len())]))
            .collect();
        Self::from_verifier(code_verifier)
    }

    /// Derive the challenge for an existing verifier
    #[must_use]
    pub fn from_verifier(code_verifier: String) -> Self {
        let code_challenge = Self::challenge_for(&code_verifier);
        Self {
            code_verifier,
            code_challenge,
            code_challenge_method: CODE_CHALLENGE_METHOD,
        }
    }

    /// `base64url(SHA256(verifier))` without padding
    #[must_use]
    pub fn challenge_for(code_verifier: &str) -> String {
        let hash = Sha256::digest(code_verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(hash)
    }

    /// Check a verifier against a challenge in constant time
    #[must_use]
    pub fn verify(code_verifier: &str, code_challenge: &str) -> bool {
        let computed = Self::challenge_for(code_verifier);
        computed.as_bytes().ct_eq(code_challenge.as_bytes()).into()
    }
}

/// Validate verifier length and character set
///
/// # Errors
///
/// Returns `InvalidInput` if the verifier is outside 43-128 characters or contains
/// characters outside the unreserved set
pub fn validate_verifier(code_verifier: &str) -> AppResult<()> {
    let len = code_verifier.len();
    if !(CODE_VERIFIER_MIN_LENGTH..=CODE_VERIFIER_MAX_LENGTH).contains(&len) {
        return Err(AppError::invalid_input(format!(
            "code_verifier must be {CODE_VERIFIER_MIN_LENGTH}-{CODE_VERIFIER_MAX_LENGTH} characters, got {len}"
        )));
    }
    if !code_verifier.bytes().all(|b| VERIFIER_CHARS.contains(&b)) {
        return Err(AppError::invalid_input(
            "code_verifier contains characters outside [A-Za-z0-9-._~]",
        ));
    }
    Ok(())
}

// ABOUTME: Cookie header parsing and Set-Cookie construction helpers
// ABOUTME: Used for the session token cookie and the OAuth flow key cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use http::{header::COOKIE, HeaderMap};

/// Value of the named cookie across all `Cookie` headers
#[must_use]
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for an `HttpOnly`, `SameSite=Lax` cookie
///
/// `SameSite=Lax` is required: the OAuth callback arrives as a top-level cross-site
/// navigation from the provider and must still carry the cookie.
#[must_use]
pub fn http_only_cookie(name: &str, value: &str, max_age_secs: u64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("{name}={value}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age_secs}{secure}")
}

/// `Set-Cookie` value that removes a cookie
#[must_use]
pub fn expired_cookie(name: &str, secure: bool) -> String {
    http_only_cookie(name, "", 0, secure)
}

// ABOUTME: Outbound HTTP client construction with timeout configuration
// ABOUTME: Separate clients for general backend calls and latency-sensitive token exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use crate::constants::timeouts;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client for backend REST API calls
#[must_use]
pub fn api_client() -> Client {
    create_client_with_timeout(
        timeouts::API_TIMEOUT_SECS,
        timeouts::API_CONNECT_TIMEOUT_SECS,
    )
}

/// Client for the token exchange call
///
/// Shorter timeouts: the authorization code is short-lived and the user is waiting
/// on the callback page.
#[must_use]
pub fn oauth_client() -> Client {
    create_client_with_timeout(
        timeouts::OAUTH_TIMEOUT_SECS,
        timeouts::OAUTH_CONNECT_TIMEOUT_SECS,
    )
}

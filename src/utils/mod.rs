// ABOUTME: Utility module organization for shared helpers
// ABOUTME: Cookie handling and outbound HTTP client construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

/// Cookie parsing and `Set-Cookie` construction
pub mod cookies;

/// Outbound HTTP clients
pub mod http_client;

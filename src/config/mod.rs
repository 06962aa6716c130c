// ABOUTME: Configuration management module for console settings
// ABOUTME: Environment-driven configuration for ports, backend, identity, and OAuth flow behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

/// Environment and server configuration
pub mod environment;

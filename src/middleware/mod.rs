// ABOUTME: HTTP middleware for the console router
// ABOUTME: Role-based route guarding applied per route with axum route layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

/// Role-based route guard
pub mod route_guard;

/// Route guard declaration and the axum layer enforcing it
pub use route_guard::{enforce, GuardState, RouteGuard};

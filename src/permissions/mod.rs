// ABOUTME: Role vocabulary re-exported from the core crate plus route access evaluation
// ABOUTME: Decides whether a session satisfies a route's declared roles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

/// Route access evaluation
pub mod access;

pub use access::{ensure_tenant_access, evaluate, role_matches, GuardDecision, RequiredRole};
pub use tenant_console_core::permissions::*;

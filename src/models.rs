// ABOUTME: Re-exports the console domain models from the core crate
// ABOUTME: Tenants, cloud providers, project types, projects, and tenant integrations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

pub use tenant_console_core::models::*;

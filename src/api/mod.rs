// ABOUTME: Data-access layer over the REST backend
// ABOUTME: Transport, response normalization, and typed resource clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

/// HTTP transport and status mapping
pub mod client;
/// Response envelope normalization
pub mod envelope;
/// Tenant integration endpoints
pub mod integrations;
/// Generic CRUD resource clients
pub mod resources;

pub use client::{ApiClient, BackendReply};
pub use envelope::{map_ids, ApiEnvelope};
pub use integrations::IntegrationApi;
pub use resources::{BackendResource, CloudProviders, ProjectTypes, Projects, ResourceApi, Tenants};

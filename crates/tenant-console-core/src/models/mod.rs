// ABOUTME: Console domain models mirrored from the REST backend
// ABOUTME: Re-exports tenant, cloud provider, project, and integration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! # Data Models
//!
//! Canonical shapes of the backend resources after envelope normalization.
//! Backend documents use camelCase field names and a `_id` key that the data-access
//! layer renames to `id` before these types are deserialized.

mod cloud_provider;
mod integration;
mod project;
mod tenant;

pub use cloud_provider::{
    CloudProvider, CreateCloudProviderRequest, ProviderOAuthSettings, UpdateCloudProviderRequest,
};
pub use integration::{CreateIntegrationRequest, IntegrationStatus, TenantIntegration};
pub use project::{
    CreateProjectRequest, CreateProjectTypeRequest, Project, ProjectMember, ProjectType,
    UpdateProjectRequest, UpdateProjectTypeRequest,
};
pub use tenant::{CreateTenantRequest, Tenant, UpdateTenantRequest};

// ABOUTME: Tenant integration model linking a tenant to a cloud storage provider
// ABOUTME: Tracks connection status, connection time, and granted OAuth scopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connection status of a tenant integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    /// Created but never connected
    #[default]
    Pending,
    /// OAuth tokens obtained and usable
    Active,
    /// Last connection attempt failed
    Error,
    /// Tokens revoked or removed
    Disconnected,
}

/// Tenant-scoped link to a third-party cloud storage provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantIntegration {
    /// Unique integration identifier
    pub id: String,
    /// Owning tenant
    pub tenant_id: String,
    /// Linked provider
    pub cloud_provider_id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Connection status
    #[serde(default)]
    pub status: IntegrationStatus,
    /// When the OAuth connection completed
    #[serde(default)]
    pub connected_at: Option<DateTime<Utc>>,
    /// Scopes granted by the provider
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Last error reported for this integration
    #[serde(default)]
    pub error_message: Option<String>,
}

impl TenantIntegration {
    /// Whether the integration holds usable tokens
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == IntegrationStatus::Active
    }
}

/// Request body for `POST /tenants/:id/integrations`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntegrationRequest {
    /// Provider to link
    pub cloud_provider_id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ABOUTME: Cloud storage provider model with the OAuth settings used to connect it
// ABOUTME: Providers are platform-level records that tenants link to through integrations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use serde::{Deserialize, Serialize};

/// Public OAuth settings of a provider; the client secret stays on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOAuthSettings {
    /// OAuth client ID registered with the provider
    pub client_id: String,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL, used by the backend only
    #[serde(default)]
    pub token_url: Option<String>,
    /// Scopes to request
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Third-party cloud storage provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProvider {
    /// Unique provider identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Provider kind, e.g. `google_drive` or `dropbox`
    #[serde(rename = "type", default)]
    pub provider_type: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// OAuth settings; providers without them cannot be connected
    #[serde(default)]
    pub oauth: Option<ProviderOAuthSettings>,
    /// Whether tenants may connect this provider
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// Request body for creating a cloud provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCloudProviderRequest {
    /// Display name
    pub name: String,
    /// Provider kind
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// OAuth settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<ProviderOAuthSettings>,
}

/// Request body for updating a cloud provider; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCloudProviderRequest {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement OAuth settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<ProviderOAuthSettings>,
    /// Enable or disable the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

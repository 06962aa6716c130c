// ABOUTME: Project and project type models with their create/update payloads
// ABOUTME: Projects belong to a tenant and carry per-member project roles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use crate::permissions::ProjectRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of project offered to tenants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectType {
    /// Unique project type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for creating a project type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectTypeRequest {
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for updating a project type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectTypeRequest {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A user's membership in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    /// Member user ID
    pub user_id: String,
    /// Role inside the project
    pub role: ProjectRole,
}

/// Tenant-owned project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Owning tenant
    pub tenant_id: String,
    /// Project type, when assigned
    #[serde(default)]
    pub project_type_id: Option<String>,
    /// Members and their roles
    #[serde(default)]
    pub members: Vec<ProjectMember>,
    /// When project was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// Display name
    pub name: String,
    /// Owning tenant
    pub tenant_id: String,
    /// Project type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type_id: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for updating a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New project type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type_id: Option<String>,
    /// Replacement member list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<ProjectMember>>,
}

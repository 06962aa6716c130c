// ABOUTME: Typed CRUD clients for tenants, cloud providers, project types, and projects
// ABOUTME: One generic implementation parameterized by a BackendResource descriptor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::client::{segment, ApiClient};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{
    CloudProvider, CreateCloudProviderRequest, CreateProjectRequest, CreateProjectTypeRequest,
    CreateTenantRequest, Project, ProjectType, Tenant, UpdateCloudProviderRequest,
    UpdateProjectRequest, UpdateProjectTypeRequest, UpdateTenantRequest,
};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// Describes a backend collection
pub trait BackendResource: Send + Sync + 'static {
    /// Canonical model
    type Model: DeserializeOwned + Serialize + Send;
    /// Create payload
    type Create: DeserializeOwned + Serialize + Send + Sync;
    /// Update payload
    type Update: DeserializeOwned + Serialize + Send + Sync;
    /// Collection path under the backend base URL
    const COLLECTION: &'static str;
    /// Name used in error messages
    const LABEL: &'static str;
}

/// `/tenants`
pub struct Tenants;
/// `/cloud-providers`
pub struct CloudProviders;
/// `/project-types`
pub struct ProjectTypes;
/// `/projects`
pub struct Projects;

impl BackendResource for Tenants {
    type Model = Tenant;
    type Create = CreateTenantRequest;
    type Update = UpdateTenantRequest;
    const COLLECTION: &'static str = "tenants";
    const LABEL: &'static str = "Tenant";
}

impl BackendResource for CloudProviders {
    type Model = CloudProvider;
    type Create = CreateCloudProviderRequest;
    type Update = UpdateCloudProviderRequest;
    const COLLECTION: &'static str = "cloud-providers";
    const LABEL: &'static str = "Cloud provider";
}

impl BackendResource for ProjectTypes {
    type Model = ProjectType;
    type Create = CreateProjectTypeRequest;
    type Update = UpdateProjectTypeRequest;
    const COLLECTION: &'static str = "project-types";
    const LABEL: &'static str = "Project type";
}

impl BackendResource for Projects {
    type Model = Project;
    type Create = CreateProjectRequest;
    type Update = UpdateProjectRequest;
    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "Project";
}

/// CRUD operations on one collection, on behalf of one caller
pub struct ResourceApi<'a, R> {
    api: &'a ApiClient,
    token: Option<&'a str>,
    resource: PhantomData<R>,
}

impl<'a, R: BackendResource> ResourceApi<'a, R> {
    /// Operations authenticated with `token`
    #[must_use]
    pub const fn new(api: &'a ApiClient, token: Option<&'a str>) -> Self {
        Self {
            api,
            token,
            resource: PhantomData,
        }
    }

    /// List the collection
    ///
    /// # Errors
    ///
    /// Returns the backend error
    pub async fn list(&self) -> AppResult<Vec<R::Model>> {
        self.api.get(R::COLLECTION, self.token).await
    }

    /// Fetch one item
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` naming the resource if the backend answers 404
    pub async fn get(&self, id: &str) -> AppResult<R::Model> {
        self.api
            .get(&Self::item_path(id), self.token)
            .await
            .map_err(label_not_found::<R>)
    }

    /// Create an item
    ///
    /// # Errors
    ///
    /// Returns the backend error
    pub async fn create(&self, request: &R::Create) -> AppResult<R::Model> {
        self.api.post(R::COLLECTION, request, self.token).await
    }

    /// Update an item
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` naming the resource if the backend answers 404
    pub async fn update(&self, id: &str, request: &R::Update) -> AppResult<R::Model> {
        self.api
            .put(&Self::item_path(id), request, self.token)
            .await
            .map_err(label_not_found::<R>)
    }

    /// Delete an item
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` naming the resource if the backend answers 404
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.api
            .delete(&Self::item_path(id), self.token)
            .await
            .map_err(label_not_found::<R>)
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", R::COLLECTION, segment(id))
    }
}

impl ResourceApi<'_, Projects> {
    /// Projects of one tenant
    ///
    /// # Errors
    ///
    /// Returns the backend error
    pub async fn list_for_tenant(&self, tenant_id: &str) -> AppResult<Vec<Project>> {
        self.api
            .get(
                &format!("tenants/{}/{}", segment(tenant_id), Projects::COLLECTION),
                self.token,
            )
            .await
    }
}

fn label_not_found<R: BackendResource>(error: AppError) -> AppError {
    if error.code == ErrorCode::ResourceNotFound {
        AppError::not_found(R::LABEL)
    } else {
        error
    }
}

// ABOUTME: Tenant integration endpoints nested under a tenant on the backend
// ABOUTME: List, fetch, create, and delete the cloud-provider links of one tenant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::client::{segment, ApiClient};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{CreateIntegrationRequest, TenantIntegration};

/// Integration operations for one tenant, on behalf of one caller
pub struct IntegrationApi<'a> {
    api: &'a ApiClient,
    tenant_id: &'a str,
    token: Option<&'a str>,
}

impl<'a> IntegrationApi<'a> {
    /// Operations on `tenant_id`'s integrations authenticated with `token`
    #[must_use]
    pub const fn new(api: &'a ApiClient, tenant_id: &'a str, token: Option<&'a str>) -> Self {
        Self {
            api,
            tenant_id,
            token,
        }
    }

    fn collection_path(&self) -> String {
        format!("tenants/{}/integrations", segment(self.tenant_id))
    }

    fn item_path(&self, integration_id: &str) -> String {
        format!("{}/{}", self.collection_path(), segment(integration_id))
    }

    /// List the tenant's integrations
    ///
    /// # Errors
    ///
    /// Returns the backend error
    pub async fn list(&self) -> AppResult<Vec<TenantIntegration>> {
        self.api.get(&self.collection_path(), self.token).await
    }

    /// Fetch one integration
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the backend answers 404 or the integration belongs to
    /// another tenant
    pub async fn get(&self, integration_id: &str) -> AppResult<TenantIntegration> {
        let integration: TenantIntegration = self
            .api
            .get(&self.item_path(integration_id), self.token)
            .await
            .map_err(not_found)?;
        if integration.tenant_id != self.tenant_id {
            return Err(AppError::not_found("Integration"));
        }
        Ok(integration)
    }

    /// Link a provider to the tenant
    ///
    /// # Errors
    ///
    /// Returns the backend error
    pub async fn create(&self, request: &CreateIntegrationRequest) -> AppResult<TenantIntegration> {
        self.api
            .post(&self.collection_path(), request, self.token)
            .await
    }

    /// Remove an integration
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the backend answers 404
    pub async fn delete(&self, integration_id: &str) -> AppResult<()> {
        self.api
            .delete(&self.item_path(integration_id), self.token)
            .await
            .map_err(not_found)
    }
}

fn not_found(error: AppError) -> AppError {
    if error.code == ErrorCode::ResourceNotFound {
        AppError::not_found("Integration")
    } else {
        error
    }
}

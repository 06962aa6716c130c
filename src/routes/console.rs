// ABOUTME: Console REST routes proxying tenant, provider, project, and integration CRUD to the backend
// ABOUTME: Each route declares its roles; tenant-scoped routes also check the caller's tenant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! Console data routes
//!
//! | Route | Roles |
//! |-------|-------|
//! | `/api/tenants[/:tenant_id]` | `SUPERADMIN` |
//! | `/api/cloud-providers[/:id]` | `SUPERADMIN` |
//! | `GET /api/project-types[/:id]` | `SUPERADMIN`, `TENANT_OWNER` |
//! | writes on `/api/project-types[/:id]` | `SUPERADMIN` |
//! | `/api/projects` | `SUPERADMIN`, `TENANT_OWNER` |
//! | `GET /api/projects/:project_id` | `SUPERADMIN`, `TENANT_OWNER`, `OWNER`, `DEPUTY`, `MEMBER` |
//! | `PUT /api/projects/:project_id` | `SUPERADMIN`, `TENANT_OWNER`, `OWNER`, `DEPUTY` |
//! | `DELETE /api/projects/:project_id` | `SUPERADMIN`, `TENANT_OWNER`, `OWNER` |
//! | `/api/tenants/:tenant_id/integrations[/:integration_id]` | `SUPERADMIN`, `TENANT_OWNER` |

use crate::api::{
    BackendResource, CloudProviders, IntegrationApi, ProjectTypes, Projects, ResourceApi, Tenants,
};
use crate::auth::{Session, SessionContext};
use crate::constants::roles;
use crate::context::AppContext;
use crate::errors::{AppError, AppResult};
use crate::middleware::RouteGuard;
use crate::models::{
    CreateIntegrationRequest, CreateProjectRequest, Project, TenantIntegration,
    UpdateProjectRequest,
};
use crate::permissions::{ensure_tenant_access, ProjectRole};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Query of `GET /api/projects`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    /// Restrict to one tenant; tenant owners always get their own
    pub tenant_id: Option<String>,
}

/// Console data routes
pub struct ConsoleApiRoutes;

impl ConsoleApiRoutes {
    /// Create all data routes
    pub fn routes(ctx: &Arc<AppContext>) -> Router {
        let admin = || RouteGuard::new(&[roles::SUPERADMIN]);
        let tenant_admin = || RouteGuard::new(&[roles::SUPERADMIN, roles::TENANT_OWNER]);
        let project_reader = RouteGuard::new(&[
            roles::SUPERADMIN,
            roles::TENANT_OWNER,
            roles::OWNER,
            roles::DEPUTY,
            roles::MEMBER,
        ]);
        let project_editor =
            RouteGuard::new(&[roles::SUPERADMIN, roles::TENANT_OWNER, roles::OWNER, roles::DEPUTY]);
        let project_owner = RouteGuard::new(&[roles::SUPERADMIN, roles::TENANT_OWNER, roles::OWNER]);

        Router::new()
            .route(
                "/api/tenants",
                admin().protect(ctx, get(list::<Tenants>).post(create::<Tenants>)),
            )
            .route(
                "/api/tenants/:tenant_id",
                admin().protect(
                    ctx,
                    get(fetch::<Tenants>)
                        .put(update::<Tenants>)
                        .delete(remove::<Tenants>),
                ),
            )
            .route(
                "/api/cloud-providers",
                admin().protect(
                    ctx,
                    get(list::<CloudProviders>).post(create::<CloudProviders>),
                ),
            )
            .route(
                "/api/cloud-providers/:id",
                admin().protect(
                    ctx,
                    get(fetch::<CloudProviders>)
                        .put(update::<CloudProviders>)
                        .delete(remove::<CloudProviders>),
                ),
            )
            .route(
                "/api/project-types",
                tenant_admin()
                    .protect(ctx, get(list::<ProjectTypes>))
                    .merge(admin().protect(ctx, post(create::<ProjectTypes>))),
            )
            .route(
                "/api/project-types/:id",
                tenant_admin()
                    .protect(ctx, get(fetch::<ProjectTypes>))
                    .merge(admin().protect(
                        ctx,
                        put(update::<ProjectTypes>).delete(remove::<ProjectTypes>),
                    )),
            )
            .route(
                "/api/projects",
                tenant_admin().protect(
                    ctx,
                    get(Self::handle_list_projects).post(Self::handle_create_project),
                ),
            )
            .route(
                "/api/projects/:project_id",
                project_reader
                    .protect(ctx, get(Self::handle_get_project))
                    .merge(project_editor.protect(ctx, put(Self::handle_update_project)))
                    .merge(project_owner.protect(ctx, delete(Self::handle_delete_project))),
            )
            .route(
                "/api/tenants/:tenant_id/integrations",
                tenant_admin().protect(
                    ctx,
                    get(Self::handle_list_integrations).post(Self::handle_create_integration),
                ),
            )
            .route(
                "/api/tenants/:tenant_id/integrations/:integration_id",
                tenant_admin().protect(
                    ctx,
                    get(Self::handle_get_integration).delete(Self::handle_delete_integration),
                ),
            )
            .with_state(ctx.clone())
    }

    async fn handle_list_projects(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Query(query): Query<ProjectListQuery>,
    ) -> AppResult<Json<Vec<Project>>> {
        let projects = ResourceApi::<Projects>::new(&ctx.api, session.bearer_token());
        if session.is_super_admin() {
            return Ok(Json(match query.tenant_id.as_deref() {
                Some(tenant_id) => projects.list_for_tenant(tenant_id).await?,
                None => projects.list().await?,
            }));
        }

        let own_tenant = session
            .tenant_id
            .as_deref()
            .ok_or_else(|| AppError::permission_denied("Session is not bound to a tenant"))?;
        if let Some(requested) = query.tenant_id.as_deref() {
            ensure_tenant_access(&session, requested)?;
        }
        Ok(Json(projects.list_for_tenant(own_tenant).await?))
    }

    async fn handle_create_project(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Json(request): Json<CreateProjectRequest>,
    ) -> AppResult<Response> {
        ensure_tenant_access(&session, &request.tenant_id)?;
        let project = ResourceApi::<Projects>::new(&ctx.api, session.bearer_token())
            .create(&request)
            .await?;
        info!(
            user.id = %session.user_id,
            tenant.id = %project.tenant_id,
            project.id = %project.id,
            "Project created"
        );
        Ok((StatusCode::CREATED, Json(project)).into_response())
    }

    async fn handle_get_project(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Path(project_id): Path<String>,
    ) -> AppResult<Json<Project>> {
        let allowed = [ProjectRole::Owner, ProjectRole::Deputy, ProjectRole::Member];
        if let Some(project) = authorize_project(&ctx, &session, &project_id, &allowed).await? {
            return Ok(Json(project));
        }
        let project = ResourceApi::<Projects>::new(&ctx.api, session.bearer_token())
            .get(&project_id)
            .await?;
        Ok(Json(project))
    }

    async fn handle_update_project(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Path(project_id): Path<String>,
        Json(request): Json<UpdateProjectRequest>,
    ) -> AppResult<Json<Project>> {
        let allowed = [ProjectRole::Owner, ProjectRole::Deputy];
        authorize_project(&ctx, &session, &project_id, &allowed).await?;
        let project = ResourceApi::<Projects>::new(&ctx.api, session.bearer_token())
            .update(&project_id, &request)
            .await?;
        Ok(Json(project))
    }

    async fn handle_delete_project(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Path(project_id): Path<String>,
    ) -> AppResult<StatusCode> {
        authorize_project(&ctx, &session, &project_id, &[ProjectRole::Owner]).await?;
        ResourceApi::<Projects>::new(&ctx.api, session.bearer_token())
            .delete(&project_id)
            .await?;
        info!(user.id = %session.user_id, project.id = %project_id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    }

    async fn handle_list_integrations(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Path(tenant_id): Path<String>,
    ) -> AppResult<Json<Vec<TenantIntegration>>> {
        ensure_tenant_access(&session, &tenant_id)?;
        let integrations = IntegrationApi::new(&ctx.api, &tenant_id, session.bearer_token())
            .list()
            .await?;
        Ok(Json(integrations))
    }

    async fn handle_create_integration(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Path(tenant_id): Path<String>,
        Json(request): Json<CreateIntegrationRequest>,
    ) -> AppResult<Response> {
        ensure_tenant_access(&session, &tenant_id)?;
        let integration = IntegrationApi::new(&ctx.api, &tenant_id, session.bearer_token())
            .create(&request)
            .await?;
        info!(
            tenant.id = %tenant_id,
            integration.id = %integration.id,
            provider.id = %integration.cloud_provider_id,
            "Integration created"
        );
        Ok((StatusCode::CREATED, Json(integration)).into_response())
    }

    async fn handle_get_integration(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Path((tenant_id, integration_id)): Path<(String, String)>,
    ) -> AppResult<Json<TenantIntegration>> {
        ensure_tenant_access(&session, &tenant_id)?;
        let integration = IntegrationApi::new(&ctx.api, &tenant_id, session.bearer_token())
            .get(&integration_id)
            .await?;
        Ok(Json(integration))
    }

    async fn handle_delete_integration(
        State(ctx): State<Arc<AppContext>>,
        Extension(session): Extension<Session>,
        Path((tenant_id, integration_id)): Path<(String, String)>,
    ) -> AppResult<StatusCode> {
        ensure_tenant_access(&session, &tenant_id)?;
        IntegrationApi::new(&ctx.api, &tenant_id, session.bearer_token())
            .delete(&integration_id)
            .await?;
        info!(tenant.id = %tenant_id, integration.id = %integration_id, "Integration deleted");
        Ok(StatusCode::NO_CONTENT)
    }
}

/// Scope a project route to the caller
///
/// Callers holding one of `allowed` in the project pass directly. Everyone else (tenant
/// owners) must own the project's tenant; the fetched project is returned so the caller
/// does not fetch it twice.
async fn authorize_project(
    ctx: &AppContext,
    session: &Session,
    project_id: &str,
    allowed: &[ProjectRole],
) -> AppResult<Option<Project>> {
    let holds_allowed_role = session
        .project_roles
        .get(project_id)
        .is_some_and(|role| allowed.contains(role));
    if session.is_super_admin() || holds_allowed_role {
        return Ok(None);
    }
    let project = ResourceApi::<Projects>::new(&ctx.api, session.bearer_token())
        .get(project_id)
        .await?;
    ensure_tenant_access(session, &project.tenant_id)?;
    Ok(Some(project))
}

async fn list<R: BackendResource>(
    State(ctx): State<Arc<AppContext>>,
    Extension(session): Extension<Session>,
) -> AppResult<Json<Vec<R::Model>>> {
    let items = ResourceApi::<R>::new(&ctx.api, session.bearer_token())
        .list()
        .await?;
    Ok(Json(items))
}

async fn fetch<R: BackendResource>(
    State(ctx): State<Arc<AppContext>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> AppResult<Json<R::Model>> {
    let item = ResourceApi::<R>::new(&ctx.api, session.bearer_token())
        .get(&id)
        .await?;
    Ok(Json(item))
}

async fn create<R: BackendResource>(
    State(ctx): State<Arc<AppContext>>,
    Extension(session): Extension<Session>,
    Json(request): Json<R::Create>,
) -> AppResult<Response> {
    let item = ResourceApi::<R>::new(&ctx.api, session.bearer_token())
        .create(&request)
        .await?;
    info!(user.id = %session.user_id, resource = R::LABEL, "Resource created");
    Ok((StatusCode::CREATED, Json(item)).into_response())
}

async fn update<R: BackendResource>(
    State(ctx): State<Arc<AppContext>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(request): Json<R::Update>,
) -> AppResult<Json<R::Model>> {
    let item = ResourceApi::<R>::new(&ctx.api, session.bearer_token())
        .update(&id, &request)
        .await?;
    Ok(Json(item))
}

async fn remove<R: BackendResource>(
    State(ctx): State<Arc<AppContext>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    ResourceApi::<R>::new(&ctx.api, session.bearer_token())
        .delete(&id)
        .await?;
    info!(user.id = %session.user_id, resource = R::LABEL, resource.id = %id, "Resource deleted");
    Ok(StatusCode::NO_CONTENT)
}

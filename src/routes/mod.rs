// ABOUTME: Route module organization for the tenant console HTTP surface
// ABOUTME: Assembles health, authentication, data, and OAuth routes under shared tracing layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! Route module for the tenant console
//!
//! Each domain module exposes a `*Routes` type whose `routes` function returns a finished
//! [`Router`]. Guards are attached per route, so the assembled router needs no global
//! authentication layer.

/// Login, logout, unauthorized, and session routes
pub mod auth;
/// Tenant, provider, project, and integration data routes
pub mod console;
/// Liveness route
pub mod health;
/// `OAuth` connect and callback routes
pub mod oauth;

pub use auth::{AuthRoutes, LoginQuery, SessionSummary};
pub use console::{ConsoleApiRoutes, ProjectListQuery};
pub use health::HealthRoutes;
pub use oauth::{OAuthRoutes, OAuthTemplateRenderer};

use crate::context::AppContext;
use axum::Router;
use std::sync::Arc;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// The complete console router
pub struct ConsoleRoutes;

impl ConsoleRoutes {
    /// Assemble every route with request IDs and HTTP tracing
    pub fn router(ctx: Arc<AppContext>) -> Router {
        Router::new()
            .merge(HealthRoutes::routes())
            .merge(AuthRoutes::routes(&ctx))
            .merge(ConsoleApiRoutes::routes(&ctx))
            .merge(OAuthRoutes::routes(&ctx))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }
}

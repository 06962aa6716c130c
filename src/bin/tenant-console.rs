// ABOUTME: Server binary for the multi-tenant administration console
// ABOUTME: Loads configuration, initializes logging, and serves the guarded console router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! # Tenant Console Server Binary
//!
//! Serves the console routes, the cloud-provider `OAuth` flow, and the backend proxy.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tenant_console::{
    config::environment::ConsoleConfig, constants::defaults, context::AppContext, logging,
    routes::ConsoleRoutes,
};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "tenant-console")]
#[command(about = "Tenant Console - role-gated administration of tenants and cloud integrations")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConsoleConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;
    info!("Starting Tenant Console");
    info!("{}", config.summary());

    let port = config.http_port;
    let context = Arc::new(AppContext::from_config(config)?);
    spawn_flow_purge(context.clone());

    let app = ConsoleRoutes::router(context.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    display_available_endpoints(&context.config);
    info!("Tenant console listening on {addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Tenant console stopped");
    Ok(())
}

/// Periodically drop connection attempts that were never completed
fn spawn_flow_purge(context: Arc<AppContext>) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(defaults::FLOW_PURGE_INTERVAL_SECS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let purged = context.oauth_flow.purge_expired().await;
            if purged > 0 {
                debug!(purged, "Purged abandoned OAuth connection attempts");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received");
}

#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(config: &ConsoleConfig) {
    let base = &config.public_base_url;
    let login = &config.routes.login;
    info!("=== Available Endpoints ===");
    info!("   Health:            GET  {base}/health");
    info!("   Login:             GET  {base}{login}?return_to=/");
    info!("   Logout:            GET  {base}/logout");
    info!("   Session:           GET  {base}/api/session");
    info!("   Tenants:           {base}/api/tenants");
    info!("   Cloud Providers:   {base}/api/cloud-providers");
    info!("   Project Types:     {base}/api/project-types");
    info!("   Projects:          {base}/api/projects");
    info!("   Integrations:      {base}/api/tenants/{{tenant_id}}/integrations");
    info!("   Connect:           GET  {base}/api/tenants/{{tenant_id}}/integrations/{{integration_id}}/connect");
    info!("   OAuth Callback:    GET  {base}/oauth/callback");
    info!("=== End of Endpoint List ===");
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tenant_provisioner::config::Config;
use tenant_provisioner::intake::http::{router, AppState};
use tenant_provisioner::intake::{Intake, IntakeQueue};
use tenant_provisioner::kubernetes::{create_cluster_client, wait_for_api_server, KubeGateway};
use tenant_provisioner::provisioning::{Orchestrator, TracingReportSink};
use tenant_provisioner::release::HelmRunner;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tenant_provisioner=info,release=info")),
        )
        .init();

    info!("Starting tenant provisioner");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: listen_addr={}, intake_timeout={:?}, environments={:?}",
        config.listen_addr, config.intake_timeout, config.provisioning.environments
    );

    // Create Kubernetes client
    let client = create_cluster_client(&config).await?;

    info!("Waiting for the Kubernetes API server to become available...");
    wait_for_api_server(&client).await?;

    let orchestrator = Orchestrator::new(
        Arc::new(config.provisioning.clone()),
        Arc::new(KubeGateway::new(client)),
        Arc::new(HelmRunner::new(config.provisioning.release.binary.clone())),
        Arc::new(TracingReportSink),
    );

    let intake = Intake::new(orchestrator, config.intake_timeout);
    let (queue, queue_handle) = IntakeQueue::new(intake.clone());
    let app = router(AppState::new(intake, queue_handle));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Listening on {}", config.listen_addr);

    // Run the queue consumer and the HTTP intake concurrently
    tokio::try_join!(queue.run(), async {
        axum::serve(listener, app).await.context("HTTP intake failed")
    })?;

    warn!("Intake stopped unexpectedly");
    Ok(())
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation

use crate::config::Config;
use crate::error::{ProvisionerError, Result};
use kube::{Client, Config as KConfig};
use tracing::{debug, info, instrument};

/// Create the control-plane client, honouring an explicit API endpoint when configured
#[instrument(skip(config))]
pub async fn create_cluster_client(config: &Config) -> Result<Client> {
    let mut c = KConfig::infer()
        .await
        .map_err(|e| ProvisionerError::Config(format!("Failed to infer config: {}", e)))?;

    if let Some(url) = &config.cluster_api_url {
        debug!("Overriding cluster URL {} with {}", c.cluster_url, url);
        c.cluster_url = url.parse().map_err(|e| {
            ProvisionerError::Config(format!("Invalid CLUSTER_API_URL {}: {}", url, e))
        })?;
    }

    info!("Using cluster API at {}", c.cluster_url);

    Client::try_from(c)
        .map_err(|e| ProvisionerError::Config(format!("Failed to create client: {}", e)))
}

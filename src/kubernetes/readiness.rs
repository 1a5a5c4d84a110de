// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! API server availability checking

use crate::constants::readiness::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::Result;
use kube::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Wait for the API server to answer a version request.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_api_server(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match client.apiserver_version().await {
            Ok(version) => {
                info!("API server is available (version {})", version.git_version);
                return Ok(());
            }
            Err(e) => {
                warn!(
                    "API server not reachable: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        interval = next_interval(interval);
    }
}

fn next_interval(interval: u64) -> u64 {
    (interval * 2).min(POLL_MAX_INTERVAL_SECS)
}

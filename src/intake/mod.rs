// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Event intake: queue messages and HTTP calls delivered to the orchestrator.

pub mod http;
pub mod queue;

pub use queue::{IntakeHandle, IntakeQueue};

use crate::provisioning::{OnboardingOutcome, OnboardingRequest, Orchestrator};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Runs onboarding requests under the intake timeout, whatever transport delivered them
#[derive(Clone)]
pub struct Intake {
    orchestrator: Orchestrator,
    timeout: Duration,
}

impl Intake {
    pub fn new(orchestrator: Orchestrator, timeout: Duration) -> Self {
        Self {
            orchestrator,
            timeout,
        }
    }

    /// Run the request on its own task and wait for it up to the timeout.
    ///
    /// On timeout the run is told to start no further steps, but gateway calls
    /// already in flight are left to finish in the background.
    #[instrument(skip(self), fields(namespace = %request.namespace_name()))]
    pub async fn dispatch(&self, request: OnboardingRequest) -> OnboardingOutcome {
        let namespace = request.namespace_name();
        let cancel = CancellationToken::new();
        let (progress_tx, progress_rx) = watch::channel(Vec::new());

        let run = {
            let orchestrator = self.orchestrator.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                orchestrator
                    .provision_tracked(&request, &cancel, &progress_tx)
                    .await
            })
        };

        let steps = self.orchestrator.plan().steps();
        match tokio::time::timeout(self.timeout, run).await {
            Ok(Ok(outcome)) => {
                info!("Onboarding finished with status {:?}", outcome.status);
                outcome
            }
            Ok(Err(e)) => {
                error!("Provisioning task for {} aborted: {}", namespace, e);
                OnboardingOutcome::interrupted(
                    namespace,
                    steps,
                    progress_rx.borrow().clone(),
                    format!("provisioning task aborted: {}", e),
                )
            }
            Err(_) => {
                cancel.cancel();
                warn!(
                    "Provisioning {} did not finish within {:?}, no further steps will start",
                    namespace, self.timeout
                );
                OnboardingOutcome::interrupted(
                    namespace,
                    steps,
                    progress_rx.borrow().clone(),
                    format!("timed out after {:?}", self.timeout),
                )
            }
        }
    }
}

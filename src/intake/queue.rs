// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Queue intake: onboarding messages consumed from a channel.

use crate::constants::INTAKE_QUEUE_CAPACITY;
use crate::error::{ProvisionerError, Result};
use crate::intake::Intake;
use crate::provisioning::OnboardingRequest;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Consumes onboarding messages and runs each one on its own task
pub struct IntakeQueue {
    intake: Intake,
    event_rx: mpsc::Receiver<OnboardingRequest>,
}

/// Handle to publish onboarding messages to the IntakeQueue
#[derive(Clone)]
pub struct IntakeHandle {
    event_tx: mpsc::Sender<OnboardingRequest>,
}

impl IntakeHandle {
    pub async fn send(&self, request: OnboardingRequest) -> Result<()> {
        self.event_tx.send(request).await.map_err(|e| {
            error!("Failed to enqueue onboarding event: {}", e);
            ProvisionerError::IntakeClosed
        })
    }
}

impl IntakeQueue {
    pub fn new(intake: Intake) -> (Self, IntakeHandle) {
        let (event_tx, event_rx) = mpsc::channel(INTAKE_QUEUE_CAPACITY);

        let queue = Self { intake, event_rx };
        let handle = IntakeHandle { event_tx };
        (queue, handle)
    }

    /// Runs until every handle is dropped, then waits for the runs still in progress
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Intake queue started, listening for onboarding events...");

        let mut runs = JoinSet::new();
        while let Some(request) = self.event_rx.recv().await {
            debug!("Received onboarding event: {:?}", request);
            let intake = self.intake.clone();
            runs.spawn(async move { intake.dispatch(request).await });

            while let Some(finished) = runs.try_join_next() {
                if let Err(e) = finished {
                    error!("Onboarding run panicked: {}", e);
                }
            }
        }

        info!("Intake queue closed, waiting for {} runs", runs.len());
        while let Some(finished) = runs.join_next().await {
            if let Err(e) = finished {
                error!("Onboarding run panicked: {}", e);
            }
        }

        Ok(())
    }
}

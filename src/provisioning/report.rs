// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Where finished outcomes are reported

use crate::provisioning::outcome::{OnboardingOutcome, OverallStatus, StepStatus};
use tracing::{error, info, warn};

/// Receives every outcome the orchestrator produces
pub trait ReportSink: Send + Sync {
    fn report(&self, outcome: &OnboardingOutcome);
}

/// Writes the outcome to the log, one record per step plus a summary
#[derive(Debug, Default, Clone)]
pub struct TracingReportSink;

impl ReportSink for TracingReportSink {
    fn report(&self, outcome: &OnboardingOutcome) {
        for result in &outcome.steps {
            match result.status {
                StepStatus::Failed => warn!(
                    namespace = %outcome.namespace,
                    step = %result.step,
                    "step failed: {}",
                    result.error.as_deref().unwrap_or("unknown error")
                ),
                status => info!(
                    namespace = %outcome.namespace,
                    step = %result.step,
                    "step {:?}",
                    status
                ),
            }
        }

        match outcome.status {
            OverallStatus::Success => {
                info!(namespace = %outcome.namespace, "Onboarding completed successfully")
            }
            OverallStatus::PartialFailure => {
                warn!(namespace = %outcome.namespace, "Onboarding completed with failures")
            }
            OverallStatus::Failed => error!(
                namespace = %outcome.namespace,
                cancelled = outcome.cancelled,
                "Onboarding failed{}",
                outcome
                    .rejection
                    .as_deref()
                    .map(|r| format!(": {}", r))
                    .unwrap_or_default()
            ),
        }
    }
}

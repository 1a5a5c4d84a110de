// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-step results and the overall outcome of a provisioning run

use crate::provisioning::plan::{ProvisioningStep, StepKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepStatus {
    Created,
    AlreadyExists,
    Replaced,
    Failed,
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub step: StepKind,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    pub fn succeeded(step: StepKind, status: StepStatus) -> Self {
        Self {
            step,
            status,
            error: None,
        }
    }

    pub fn failed(step: StepKind, error: impl ToString) -> Self {
        Self {
            step,
            status: StepStatus::Failed,
            error: Some(error.to_string()),
        }
    }

    pub fn not_attempted(step: StepKind) -> Self {
        Self::succeeded(step, StepStatus::NotAttempted)
    }

    pub fn is_failed(&self) -> bool {
        self.status == StepStatus::Failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallStatus {
    Success,
    PartialFailure,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingOutcome {
    pub namespace: String,
    pub status: OverallStatus,
    pub steps: Vec<StepResult>,
    /// Why the request was refused before or instead of running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
    pub cancelled: bool,
}

impl OnboardingOutcome {
    /// Outcome for a request that never reached the cluster
    pub fn rejected(namespace: String, steps: &[ProvisioningStep], reason: impl ToString) -> Self {
        Self {
            namespace,
            status: OverallStatus::Failed,
            steps: steps
                .iter()
                .map(|s| StepResult::not_attempted(s.kind))
                .collect(),
            rejection: Some(reason.to_string()),
            cancelled: false,
        }
    }

    /// Outcome reported when the caller stopped waiting for the run.
    ///
    /// `completed` is the in-order prefix of steps that finished; the rest are `NotAttempted`.
    pub fn interrupted(
        namespace: String,
        steps: &[ProvisioningStep],
        completed: Vec<StepResult>,
        reason: impl ToString,
    ) -> Self {
        let mut results = completed;
        let remaining = steps
            .iter()
            .skip(results.len())
            .map(|s| StepResult::not_attempted(s.kind));
        results.extend(remaining);

        Self {
            namespace,
            status: OverallStatus::Failed,
            steps: results,
            rejection: Some(reason.to_string()),
            cancelled: true,
        }
    }

    /// Outcome of a run that executed (some of) the plan
    pub fn from_results(namespace: String, steps: Vec<StepResult>, cancelled: bool) -> Self {
        let namespace_failed = steps
            .iter()
            .any(|r| r.step == StepKind::Namespace && r.is_failed());

        let status = if namespace_failed || cancelled {
            OverallStatus::Failed
        } else if steps.iter().any(StepResult::is_failed) {
            OverallStatus::PartialFailure
        } else {
            OverallStatus::Success
        };

        Self {
            namespace,
            status,
            steps,
            rejection: None,
            cancelled,
        }
    }

    pub fn result(&self, step: StepKind) -> Option<&StepResult> {
        self.steps.iter().find(|r| r.step == step)
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

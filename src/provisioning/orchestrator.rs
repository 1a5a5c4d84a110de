// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Runs the provisioning plan for one onboarding request.

use crate::config::ProvisioningConfig;
use crate::error::{ProvisionerError, Result};
use crate::kubernetes::{ClusterResource, ResourceGateway};
use crate::provisioning::outcome::{OnboardingOutcome, StepResult, StepStatus};
use crate::provisioning::plan::{
    IdempotencyPolicy, ProvisioningPlan, ProvisioningStep, StepAction, StepKind,
};
use crate::provisioning::report::ReportSink;
use crate::provisioning::request::{check_namespace_name, OnboardingRequest};
use crate::release::ReleaseRunner;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Executes the plan step by step.
///
/// Holds no state between runs; clones share the gateway, runner, sink and configuration.
#[derive(Clone)]
pub struct Orchestrator {
    plan: ProvisioningPlan,
    gateway: Arc<dyn ResourceGateway>,
    runner: Arc<dyn ReleaseRunner>,
    sink: Arc<dyn ReportSink>,
}

impl Orchestrator {
    pub fn new(
        config: Arc<ProvisioningConfig>,
        gateway: Arc<dyn ResourceGateway>,
        runner: Arc<dyn ReleaseRunner>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            plan: ProvisioningPlan::new(config),
            gateway,
            runner,
            sink,
        }
    }

    pub fn plan(&self) -> &ProvisioningPlan {
        &self.plan
    }

    pub async fn provision(&self, request: &OnboardingRequest) -> OnboardingOutcome {
        self.provision_until(request, &CancellationToken::new()).await
    }

    pub async fn provision_until(
        &self,
        request: &OnboardingRequest,
        cancel: &CancellationToken,
    ) -> OnboardingOutcome {
        let (progress, _) = watch::channel(Vec::new());
        self.provision_tracked(request, cancel, &progress).await
    }

    /// Run every step in order. Once `cancel` fires no further step is started;
    /// steps already completed are left in place.
    ///
    /// `progress` holds the results of the steps that have finished so far.
    #[instrument(
        skip(self, request, cancel, progress),
        fields(application = %request.application_name(), environment = %request.environment())
    )]
    pub async fn provision_tracked(
        &self,
        request: &OnboardingRequest,
        cancel: &CancellationToken,
        progress: &watch::Sender<Vec<StepResult>>,
    ) -> OnboardingOutcome {
        let namespace = request.namespace_name();
        let steps = self.plan.steps();

        if let Err(e) = request.validate(self.plan.config()) {
            warn!("Rejecting onboarding request: {}", e);
            let outcome = OnboardingOutcome::rejected(namespace, steps, e);
            self.sink.report(&outcome);
            return outcome;
        }

        info!("Provisioning namespace {}", namespace);

        let mut results = Vec::with_capacity(steps.len());
        let mut halted = false;
        let mut cancelled = false;

        for step in steps {
            if !halted && cancel.is_cancelled() {
                warn!("Run cancelled before step {}", step.kind);
                cancelled = true;
                halted = true;
            }
            if halted {
                results.push(StepResult::not_attempted(step.kind));
                continue;
            }

            info!("Create {}...", step.kind);
            let result = match self.run_step(step, &namespace).await {
                Ok(status) => {
                    info!("{} finished: {:?}", step.kind, status);
                    StepResult::succeeded(step.kind, status)
                }
                Err(e) => {
                    error!("{} failed for namespace {}: {}", step.kind, namespace, e);
                    StepResult::failed(step.kind, e)
                }
            };

            // Nothing else can be created without the namespace
            if step.kind == StepKind::Namespace && result.is_failed() {
                halted = true;
            }
            progress.send_modify(|done| done.push(result.clone()));
            results.push(result);
        }

        let outcome = OnboardingOutcome::from_results(namespace, results, cancelled);
        self.sink.report(&outcome);
        outcome
    }

    async fn run_step(&self, step: &ProvisioningStep, namespace: &str) -> Result<StepStatus> {
        if step.kind == StepKind::Namespace {
            check_namespace_name(namespace)?;
        }

        match self.plan.action(step.kind, namespace) {
            StepAction::Apply(resources) => {
                let mut statuses = Vec::with_capacity(resources.len());
                for resource in &resources {
                    statuses.push(self.apply(step.policy, namespace, resource).await?);
                }
                Ok(combine(&statuses))
            }
            StepAction::Release(params) => {
                let output = self.runner.run(namespace, &params).await?;
                if output.success() {
                    Ok(StepStatus::Replaced)
                } else {
                    Err(ProvisionerError::Release {
                        exit_code: output.exit_code,
                    })
                }
            }
        }
    }

    async fn apply(
        &self,
        policy: IdempotencyPolicy,
        namespace: &str,
        resource: &ClusterResource,
    ) -> Result<StepStatus> {
        let kind = resource.kind();
        let name = resource.name();

        match policy {
            IdempotencyPolicy::SkipIfExists => {
                match self.gateway.get(kind, namespace, &name).await? {
                    Some(existing) if existing.is_terminating() => {
                        Err(ProvisionerError::Conflict(format!(
                            "{} {}/{} is being deleted",
                            kind, namespace, name
                        )))
                    }
                    Some(_) => {
                        debug!("{} {}/{} already exists", kind, namespace, name);
                        Ok(StepStatus::AlreadyExists)
                    }
                    None => {
                        self.gateway.create(namespace, resource).await?;
                        debug!("{} {}/{} created", kind, namespace, name);
                        Ok(StepStatus::Created)
                    }
                }
            }
            IdempotencyPolicy::ReplaceAlways => {
                self.gateway.create_or_replace(namespace, resource).await?;
                debug!("{} {}/{} applied", kind, namespace, name);
                Ok(StepStatus::Replaced)
            }
        }
    }
}

/// Status of a step made of several resources
fn combine(statuses: &[StepStatus]) -> StepStatus {
    if statuses.iter().all(|s| *s == StepStatus::AlreadyExists) {
        StepStatus::AlreadyExists
    } else if statuses.contains(&StepStatus::Created) {
        StepStatus::Created
    } else {
        StepStatus::Replaced
    }
}

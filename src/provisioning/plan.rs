// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The fixed, ordered bundle of provisioning steps

use crate::config::ProvisioningConfig;
use crate::kubernetes::{manifests, ClusterResource};
use crate::release::ReleaseParams;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Namespace,
    LimitsAndQuotas,
    ServiceAccount,
    RoleBinding,
    Secret,
    NetworkPolicy,
    Release,
}

impl StepKind {
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Namespace => "Namespace",
            StepKind::LimitsAndQuotas => "Limits/Quotas",
            StepKind::ServiceAccount => "ServiceAccount",
            StepKind::RoleBinding => "RoleBinding",
            StepKind::Secret => "Secret",
            StepKind::NetworkPolicy => "NetworkPolicy",
            StepKind::Release => "Release",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for StepKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdempotencyPolicy {
    /// Look the resource up first and leave it untouched when present
    SkipIfExists,
    /// Create or replace unconditionally
    ReplaceAlways,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisioningStep {
    pub kind: StepKind,
    pub policy: IdempotencyPolicy,
}

impl ProvisioningStep {
    const fn new(kind: StepKind, policy: IdempotencyPolicy) -> Self {
        Self { kind, policy }
    }
}

/// Steps in mandatory order. RoleBinding must follow ServiceAccount.
pub const STANDARD_STEPS: [ProvisioningStep; 7] = [
    ProvisioningStep::new(StepKind::Namespace, IdempotencyPolicy::ReplaceAlways),
    ProvisioningStep::new(StepKind::LimitsAndQuotas, IdempotencyPolicy::SkipIfExists),
    ProvisioningStep::new(StepKind::ServiceAccount, IdempotencyPolicy::ReplaceAlways),
    ProvisioningStep::new(StepKind::RoleBinding, IdempotencyPolicy::ReplaceAlways),
    ProvisioningStep::new(StepKind::Secret, IdempotencyPolicy::SkipIfExists),
    ProvisioningStep::new(StepKind::NetworkPolicy, IdempotencyPolicy::ReplaceAlways),
    ProvisioningStep::new(StepKind::Release, IdempotencyPolicy::ReplaceAlways),
];

/// What a step does against the cluster
#[derive(Debug, Clone)]
pub enum StepAction {
    /// Submit these resources, in order, under the step's policy
    Apply(Vec<ClusterResource>),
    /// Run the release tool
    Release(ReleaseParams),
}

/// Turns steps into concrete cluster operations for a namespace
#[derive(Debug, Clone)]
pub struct ProvisioningPlan {
    config: Arc<ProvisioningConfig>,
}

impl ProvisioningPlan {
    pub fn new(config: Arc<ProvisioningConfig>) -> Self {
        Self { config }
    }

    pub fn steps(&self) -> &'static [ProvisioningStep] {
        &STANDARD_STEPS
    }

    pub fn config(&self) -> &ProvisioningConfig {
        &self.config
    }

    pub fn action(&self, kind: StepKind, namespace: &str) -> StepAction {
        let c = self.config.as_ref();
        match kind {
            StepKind::Namespace => {
                StepAction::Apply(vec![manifests::namespace(c, namespace).into()])
            }
            StepKind::LimitsAndQuotas => StepAction::Apply(vec![
                manifests::limit_range(c, namespace).into(),
                manifests::resource_quota(c, namespace).into(),
            ]),
            StepKind::ServiceAccount => {
                StepAction::Apply(vec![manifests::service_account(c, namespace).into()])
            }
            StepKind::RoleBinding => {
                StepAction::Apply(vec![manifests::role_binding(c, namespace).into()])
            }
            StepKind::Secret => StepAction::Apply(vec![manifests::secret(c, namespace).into()]),
            StepKind::NetworkPolicy => {
                StepAction::Apply(vec![manifests::network_policy(c, namespace).into()])
            }
            StepKind::Release => StepAction::Release(ReleaseParams::from(&c.release)),
        }
    }
}

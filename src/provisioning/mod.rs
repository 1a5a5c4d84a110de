// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tenant provisioning: request, plan, orchestration and reporting.

pub mod orchestrator;
pub mod outcome;
pub mod plan;
pub mod report;
pub mod request;

pub use orchestrator::Orchestrator;
pub use outcome::{OnboardingOutcome, OverallStatus, StepResult, StepStatus};
pub use plan::{IdempotencyPolicy, ProvisioningPlan, ProvisioningStep, StepKind};
pub use report::{ReportSink, TracingReportSink};
pub use request::OnboardingRequest;

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionerError {
    #[error("Invalid onboarding request: {0}")]
    Validation(String),

    #[error("Namespace policy violation: {0}")]
    PolicyViolation(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Kubernetes API error: {0}")]
    Gateway(#[from] kube::Error),

    #[error("Release tool exited with code {exit_code}")]
    Release { exit_code: i32 },

    #[error("Failed to run release tool: {0}")]
    ReleaseLaunch(#[from] std::io::Error),

    #[error("Intake queue is closed")]
    IntakeClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProvisionerError {
    /// True for errors that reject the request before any cluster call
    pub fn is_validation(&self) -> bool {
        matches!(self, ProvisionerError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, ProvisionerError>;

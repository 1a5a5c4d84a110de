// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Workload release through the external packaging tool.

pub mod helm;

pub use helm::HelmRunner;

use crate::config::ReleaseConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// What to install into the tenant namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseParams {
    pub release_name: String,
    pub chart: String,
    pub values: BTreeMap<String, String>,
}

impl From<&ReleaseConfig> for ReleaseParams {
    fn from(config: &ReleaseConfig) -> Self {
        Self {
            release_name: config.release_name.clone(),
            chart: config.chart.clone(),
            values: config.values.clone(),
        }
    }
}

/// Exit status and the lines the tool printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutput {
    pub exit_code: i32,
    pub output_lines: Vec<String>,
}

impl ReleaseOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a release into a namespace. Must be safe for concurrent use across runs.
#[async_trait]
pub trait ReleaseRunner: Send + Sync {
    async fn run(&self, namespace: &str, params: &ReleaseParams) -> Result<ReleaseOutput>;
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Service configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP intake listens on
    pub listen_addr: SocketAddr,
    /// How long an intake waits for a provisioning run before reporting it failed
    pub intake_timeout: Duration,
    /// Cluster API endpoint; the kubeconfig/in-cluster default is used when unset
    pub cluster_api_url: Option<String>,
    pub provisioning: ProvisioningConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| defaults::LISTEN_ADDR.to_string())
            .parse()
            .context("LISTEN_ADDR is not a valid socket address")?;

        let intake_timeout = match env::var("INTAKE_TIMEOUT_SECS") {
            Ok(v) => parse_timeout(&v)?,
            Err(_) => Duration::from_secs(defaults::INTAKE_TIMEOUT_SECS),
        };

        let cluster_api_url = env::var("CLUSTER_API_URL").ok().filter(|v| !v.is_empty());

        let provisioning = match env::var("PROVISIONER_CONFIG") {
            Ok(path) => ProvisioningConfig::load(&path)?,
            Err(_) => ProvisioningConfig::default(),
        };

        Ok(Config {
            listen_addr,
            intake_timeout,
            cluster_api_url,
            provisioning,
        })
    }
}

fn parse_timeout(value: &str) -> Result<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("INTAKE_TIMEOUT_SECS '{}' is not a number of seconds", value))?;
    anyhow::ensure!(secs > 0, "INTAKE_TIMEOUT_SECS must be greater than zero");
    Ok(Duration::from_secs(secs))
}

/// Values the provisioning steps read. Read-only for the lifetime of the process.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProvisioningConfig {
    pub resource_quota_name: String,
    pub limit_range_name: String,
    pub cpu_limit: String,
    pub memory_limit: String,
    pub label_key: String,
    pub label_value: String,
    pub service_account_name: String,
    pub role_name: String,
    pub secret_name: String,
    pub secret_key: String,
    pub secret_value: String,
    pub network_policy_name: String,
    pub network_key: String,
    pub network_value: String,
    pub network_port: i32,
    /// Accepted environment codes, compared case-insensitively
    pub environments: Vec<String>,
    pub release: ReleaseConfig,
}

impl ProvisioningConfig {
    /// Load provisioning values from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read provisioning config {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("Failed to parse provisioning config {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: ProvisioningConfig = serde_yaml::from_str(raw)?;
        anyhow::ensure!(
            !config.environments.is_empty(),
            "at least one environment code must be configured"
        );
        anyhow::ensure!(
            (1..=65535).contains(&config.network_port),
            "network-port {} is out of range",
            config.network_port
        );
        Ok(config)
    }

    pub fn accepts_environment(&self, environment: &str) -> bool {
        self.environments
            .iter()
            .any(|e| e.eq_ignore_ascii_case(environment))
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            resource_quota_name: defaults::RESOURCE_QUOTA_NAME.to_string(),
            limit_range_name: defaults::LIMIT_RANGE_NAME.to_string(),
            cpu_limit: defaults::CPU_LIMIT.to_string(),
            memory_limit: defaults::MEMORY_LIMIT.to_string(),
            label_key: defaults::LABEL_KEY.to_string(),
            label_value: defaults::LABEL_VALUE.to_string(),
            service_account_name: defaults::SERVICE_ACCOUNT_NAME.to_string(),
            role_name: defaults::ROLE_NAME.to_string(),
            secret_name: defaults::SECRET_NAME.to_string(),
            secret_key: defaults::SECRET_KEY.to_string(),
            secret_value: defaults::SECRET_VALUE.to_string(),
            network_policy_name: defaults::NETWORK_POLICY_NAME.to_string(),
            network_key: defaults::NETWORK_KEY.to_string(),
            network_value: defaults::NETWORK_VALUE.to_string(),
            network_port: defaults::NETWORK_PORT,
            environments: defaults::ENVIRONMENTS.iter().map(|e| e.to_string()).collect(),
            release: ReleaseConfig::default(),
        }
    }
}

/// How the release step invokes the packaging tool
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReleaseConfig {
    pub binary: String,
    pub chart: String,
    pub release_name: String,
    /// Passed to the tool as `--set key=value`
    pub values: BTreeMap<String, String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            binary: defaults::RELEASE_BINARY.to_string(),
            chart: defaults::RELEASE_CHART.to_string(),
            release_name: defaults::RELEASE_NAME.to_string(),
            values: BTreeMap::new(),
        }
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The field manager name used for server-side apply
pub const OPERATOR_NAME: &str = "tenant-provisioner";

/// Built-in provisioning values used when no configuration file overrides them
pub mod defaults {
    pub const RESOURCE_QUOTA_NAME: &str = "resource-quota";
    pub const LIMIT_RANGE_NAME: &str = "limit-range";
    pub const CPU_LIMIT: &str = "500m";
    pub const MEMORY_LIMIT: &str = "512Mi";
    pub const LABEL_KEY: &str = "app";
    pub const LABEL_VALUE: &str = "my-application";
    pub const SERVICE_ACCOUNT_NAME: &str = "service-account-name";
    pub const ROLE_NAME: &str = "role-name";
    pub const SECRET_NAME: &str = "secret-name";
    pub const SECRET_KEY: &str = "secret-data-key";
    pub const SECRET_VALUE: &str = "secret-data-value";
    pub const NETWORK_POLICY_NAME: &str = "my-network-policy";
    pub const NETWORK_KEY: &str = "network-key";
    pub const NETWORK_VALUE: &str = "network-value";
    pub const NETWORK_PORT: i32 = 80;
    pub const ENVIRONMENTS: [&str; 5] = ["INT", "CER", "PRE", "PRO", "FOR"];

    pub const RELEASE_BINARY: &str = "helm";
    pub const RELEASE_NAME: &str = "tenant-release";
    pub const RELEASE_CHART: &str = "stable/nginx-ingress";

    pub const LISTEN_ADDR: &str = "0.0.0.0:8080";
    pub const INTAKE_TIMEOUT_SECS: u64 = 120;
}

/// Prefix of the role binding created for the tenant service account
pub const ROLE_BINDING_PREFIX: &str = "rolebinding-";

/// Capacity of the queue intake channel
pub const INTAKE_QUEUE_CAPACITY: usize = 256;

/// API server polling configuration
pub mod readiness {
    /// Initial polling interval in seconds when waiting for the API server
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

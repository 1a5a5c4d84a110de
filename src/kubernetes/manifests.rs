// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed manifests for the tenant resource bundle

use crate::config::ProvisioningConfig;
use crate::constants::ROLE_BINDING_PREFIX;
use k8s_openapi::api::core::v1::{
    LimitRange, LimitRangeItem, LimitRangeSpec, Namespace, ResourceQuota, ResourceQuotaSpec,
    Secret, ServiceAccount,
};
use k8s_openapi::api::networking::v1::{
    NetworkPolicy, NetworkPolicyIngressRule, NetworkPolicyPeer, NetworkPolicyPort,
    NetworkPolicySpec,
};
use k8s_openapi::api::rbac::v1::{RoleBinding, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

fn namespaced_meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

fn single(key: &str, value: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(key.to_string(), value.to_string())])
}

/// The tenant namespace, labelled with the application tag
pub fn namespace(config: &ProvisioningConfig, name: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(single(&config.label_key, &config.label_value)),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Default CPU request/limit for every container in the namespace
pub fn limit_range(config: &ProvisioningConfig, namespace: &str) -> LimitRange {
    let cpu = BTreeMap::from([("cpu".to_string(), Quantity(config.cpu_limit.clone()))]);

    LimitRange {
        metadata: namespaced_meta(&config.limit_range_name, namespace),
        spec: Some(LimitRangeSpec {
            limits: vec![LimitRangeItem {
                type_: "Container".to_string(),
                default: Some(cpu.clone()),
                default_request: Some(cpu),
                ..Default::default()
            }],
        }),
    }
}

/// Aggregate CPU/memory cap for the namespace
pub fn resource_quota(config: &ProvisioningConfig, namespace: &str) -> ResourceQuota {
    let hard = BTreeMap::from([
        ("limits.cpu".to_string(), Quantity(config.cpu_limit.clone())),
        ("limits.memory".to_string(), Quantity(config.memory_limit.clone())),
    ]);

    ResourceQuota {
        metadata: namespaced_meta(&config.resource_quota_name, namespace),
        spec: Some(ResourceQuotaSpec {
            hard: Some(hard),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn service_account(config: &ProvisioningConfig, namespace: &str) -> ServiceAccount {
    ServiceAccount {
        metadata: namespaced_meta(&config.service_account_name, namespace),
        ..Default::default()
    }
}

pub fn role_binding_name(config: &ProvisioningConfig) -> String {
    format!("{}{}", ROLE_BINDING_PREFIX, config.service_account_name)
}

/// Binds the tenant service account to the configured role
pub fn role_binding(config: &ProvisioningConfig, namespace: &str) -> RoleBinding {
    RoleBinding {
        metadata: namespaced_meta(&role_binding_name(config), namespace),
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "Role".to_string(),
            name: config.role_name.clone(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_string(),
            name: config.service_account_name.clone(),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        }]),
    }
}

/// Opaque secret; `ByteString` is base64-encoded when serialized
pub fn secret(config: &ProvisioningConfig, namespace: &str) -> Secret {
    Secret {
        metadata: namespaced_meta(&config.secret_name, namespace),
        type_: Some("Opaque".to_string()),
        data: Some(BTreeMap::from([(
            config.secret_key.clone(),
            ByteString(config.secret_value.as_bytes().to_vec()),
        )])),
        ..Default::default()
    }
}

/// Only pods carrying the network label may reach labelled pods, on one TCP port
pub fn network_policy(config: &ProvisioningConfig, namespace: &str) -> NetworkPolicy {
    let selector = LabelSelector {
        match_labels: Some(single(&config.network_key, &config.network_value)),
        ..Default::default()
    };

    NetworkPolicy {
        metadata: namespaced_meta(&config.network_policy_name, namespace),
        spec: Some(NetworkPolicySpec {
            pod_selector: selector.clone(),
            policy_types: Some(vec!["Ingress".to_string()]),
            ingress: Some(vec![NetworkPolicyIngressRule {
                from: Some(vec![NetworkPolicyPeer {
                    pod_selector: Some(selector),
                    ..Default::default()
                }]),
                ports: Some(vec![NetworkPolicyPort {
                    port: Some(IntOrString::Int(config.network_port)),
                    protocol: Some("TCP".to_string()),
                    ..Default::default()
                }]),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

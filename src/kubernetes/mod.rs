// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation, readiness, manifests and the resource gateway.

pub mod client;
pub mod gateway;
pub mod manifests;
pub mod readiness;

pub use client::create_cluster_client;
pub use gateway::{ClusterResource, KubeGateway, ResourceGateway, ResourceKind};
pub use readiness::wait_for_api_server;

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource gateway: get/create/create-or-replace for the managed resource kinds

use crate::constants::OPERATOR_NAME;
use crate::error::{ProvisionerError, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{LimitRange, Namespace, ResourceQuota, Secret, ServiceAccount};
use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::api::rbac::v1::RoleBinding;
use kube::{
    api::{ObjectMeta, Patch, PatchParams, PostParams},
    Api, Client, Resource, ResourceExt,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fmt::Debug;
use tracing::{debug, instrument};

/// Resource kinds the provisioner manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Namespace,
    ResourceQuota,
    LimitRange,
    ServiceAccount,
    RoleBinding,
    Secret,
    NetworkPolicy,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Namespace => "Namespace",
            ResourceKind::ResourceQuota => "ResourceQuota",
            ResourceKind::LimitRange => "LimitRange",
            ResourceKind::ServiceAccount => "ServiceAccount",
            ResourceKind::RoleBinding => "RoleBinding",
            ResourceKind::Secret => "Secret",
            ResourceKind::NetworkPolicy => "NetworkPolicy",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed object of one of the managed kinds
#[derive(Debug, Clone)]
pub enum ClusterResource {
    Namespace(Namespace),
    ResourceQuota(ResourceQuota),
    LimitRange(LimitRange),
    ServiceAccount(ServiceAccount),
    RoleBinding(RoleBinding),
    Secret(Secret),
    NetworkPolicy(NetworkPolicy),
}

impl ClusterResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ClusterResource::Namespace(_) => ResourceKind::Namespace,
            ClusterResource::ResourceQuota(_) => ResourceKind::ResourceQuota,
            ClusterResource::LimitRange(_) => ResourceKind::LimitRange,
            ClusterResource::ServiceAccount(_) => ResourceKind::ServiceAccount,
            ClusterResource::RoleBinding(_) => ResourceKind::RoleBinding,
            ClusterResource::Secret(_) => ResourceKind::Secret,
            ClusterResource::NetworkPolicy(_) => ResourceKind::NetworkPolicy,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            ClusterResource::Namespace(r) => r.meta(),
            ClusterResource::ResourceQuota(r) => r.meta(),
            ClusterResource::LimitRange(r) => r.meta(),
            ClusterResource::ServiceAccount(r) => r.meta(),
            ClusterResource::RoleBinding(r) => r.meta(),
            ClusterResource::Secret(r) => r.meta(),
            ClusterResource::NetworkPolicy(r) => r.meta(),
        }
    }

    pub fn name(&self) -> String {
        self.metadata().name.clone().unwrap_or_default()
    }

    /// True when the object has been marked for deletion
    pub fn is_terminating(&self) -> bool {
        self.metadata().deletion_timestamp.is_some()
    }
}

impl From<Namespace> for ClusterResource {
    fn from(r: Namespace) -> Self {
        ClusterResource::Namespace(r)
    }
}

impl From<ResourceQuota> for ClusterResource {
    fn from(r: ResourceQuota) -> Self {
        ClusterResource::ResourceQuota(r)
    }
}

impl From<LimitRange> for ClusterResource {
    fn from(r: LimitRange) -> Self {
        ClusterResource::LimitRange(r)
    }
}

impl From<ServiceAccount> for ClusterResource {
    fn from(r: ServiceAccount) -> Self {
        ClusterResource::ServiceAccount(r)
    }
}

impl From<RoleBinding> for ClusterResource {
    fn from(r: RoleBinding) -> Self {
        ClusterResource::RoleBinding(r)
    }
}

impl From<Secret> for ClusterResource {
    fn from(r: Secret) -> Self {
        ClusterResource::Secret(r)
    }
}

impl From<NetworkPolicy> for ClusterResource {
    fn from(r: NetworkPolicy) -> Self {
        ClusterResource::NetworkPolicy(r)
    }
}

/// Control-plane operations the orchestrator depends on.
///
/// `namespace` is ignored for cluster-scoped kinds (Namespace).
/// Implementations must be safe for concurrent use across provisioning runs.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// Fetch a resource, `None` when it does not exist
    async fn get(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ClusterResource>>;

    /// Create a resource; fails with a conflict if it already exists
    async fn create(&self, namespace: &str, resource: &ClusterResource) -> Result<ClusterResource>;

    /// Create the resource or replace the existing one
    async fn create_or_replace(
        &self,
        namespace: &str,
        resource: &ClusterResource,
    ) -> Result<ClusterResource>;
}

/// Resource gateway backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeGateway {
    client: Client,
}

impl KubeGateway {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceGateway for KubeGateway {
    #[instrument(skip(self))]
    async fn get(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ClusterResource>> {
        let c = self.client.clone();
        let found = match kind {
            ResourceKind::Namespace => fetch(Api::<Namespace>::all(c), name)
                .await?
                .map(ClusterResource::from),
            ResourceKind::ResourceQuota => {
                fetch(Api::<ResourceQuota>::namespaced(c, namespace), name)
                    .await?
                    .map(ClusterResource::from)
            }
            ResourceKind::LimitRange => fetch(Api::<LimitRange>::namespaced(c, namespace), name)
                .await?
                .map(ClusterResource::from),
            ResourceKind::ServiceAccount => {
                fetch(Api::<ServiceAccount>::namespaced(c, namespace), name)
                    .await?
                    .map(ClusterResource::from)
            }
            ResourceKind::RoleBinding => fetch(Api::<RoleBinding>::namespaced(c, namespace), name)
                .await?
                .map(ClusterResource::from),
            ResourceKind::Secret => fetch(Api::<Secret>::namespaced(c, namespace), name)
                .await?
                .map(ClusterResource::from),
            ResourceKind::NetworkPolicy => {
                fetch(Api::<NetworkPolicy>::namespaced(c, namespace), name)
                    .await?
                    .map(ClusterResource::from)
            }
        };

        debug!("{} {}/{} present: {}", kind, namespace, name, found.is_some());
        Ok(found)
    }

    #[instrument(skip(self, resource), fields(kind = %resource.kind(), name = %resource.name()))]
    async fn create(&self, namespace: &str, resource: &ClusterResource) -> Result<ClusterResource> {
        let c = self.client.clone();
        let created: ClusterResource = match resource {
            ClusterResource::Namespace(r) => post(Api::all(c), r).await?.into(),
            ClusterResource::ResourceQuota(r) => {
                post(Api::namespaced(c, namespace), r).await?.into()
            }
            ClusterResource::LimitRange(r) => post(Api::namespaced(c, namespace), r).await?.into(),
            ClusterResource::ServiceAccount(r) => {
                post(Api::namespaced(c, namespace), r).await?.into()
            }
            ClusterResource::RoleBinding(r) => post(Api::namespaced(c, namespace), r).await?.into(),
            ClusterResource::Secret(r) => post(Api::namespaced(c, namespace), r).await?.into(),
            ClusterResource::NetworkPolicy(r) => {
                post(Api::namespaced(c, namespace), r).await?.into()
            }
        };
        Ok(created)
    }

    #[instrument(skip(self, resource), fields(kind = %resource.kind(), name = %resource.name()))]
    async fn create_or_replace(
        &self,
        namespace: &str,
        resource: &ClusterResource,
    ) -> Result<ClusterResource> {
        let c = self.client.clone();
        let applied: ClusterResource = match resource {
            ClusterResource::Namespace(r) => apply(Api::all(c), r).await?.into(),
            ClusterResource::ResourceQuota(r) => {
                apply(Api::namespaced(c, namespace), r).await?.into()
            }
            ClusterResource::LimitRange(r) => apply(Api::namespaced(c, namespace), r).await?.into(),
            ClusterResource::ServiceAccount(r) => {
                apply(Api::namespaced(c, namespace), r).await?.into()
            }
            ClusterResource::RoleBinding(r) => {
                apply(Api::namespaced(c, namespace), r).await?.into()
            }
            ClusterResource::Secret(r) => apply(Api::namespaced(c, namespace), r).await?.into(),
            ClusterResource::NetworkPolicy(r) => {
                apply(Api::namespaced(c, namespace), r).await?.into()
            }
        };
        Ok(applied)
    }
}

async fn fetch<K>(api: Api<K>, name: &str) -> Result<Option<K>>
where
    K: Clone + DeserializeOwned + Debug,
{
    match api.get(name).await {
        Ok(obj) => Ok(Some(obj)),
        Err(kube::Error::Api(err)) if err.code == 404 => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn post<K>(api: Api<K>, obj: &K) -> Result<K>
where
    K: Resource + Clone + DeserializeOwned + Serialize + Debug,
{
    match api.create(&PostParams::default(), obj).await {
        Ok(created) => Ok(created),
        Err(kube::Error::Api(err)) if err.code == 409 => Err(ProvisionerError::Conflict(format!(
            "{} already exists: {}",
            obj.name_any(),
            err.message
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Server-side apply with forced ownership, which creates or replaces the object
async fn apply<K>(api: Api<K>, obj: &K) -> Result<K>
where
    K: Resource + Clone + DeserializeOwned + Serialize + Debug,
{
    let pp = PatchParams::apply(OPERATOR_NAME).force();
    Ok(api.patch(&obj.name_any(), &pp, &Patch::Apply(obj)).await?)
}

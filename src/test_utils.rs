// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: a mocked Kubernetes API and in-memory collaborators.

use crate::config::ProvisioningConfig;
use crate::error::{ProvisionerError, Result};
use crate::kubernetes::{ClusterResource, ResourceGateway, ResourceKind};
use crate::provisioning::plan::{ProvisioningPlan, StepAction};
use crate::provisioning::{OnboardingOutcome, ReportSink};
use crate::release::{ReleaseOutput, ReleaseParams, ReleaseRunner};
use async_trait::async_trait;
use http::{Request, Response};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PATCH (server-side apply) requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

type MockResult = std::result::Result<Response<Body>, tower::BoxError>;

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = Pin<Box<dyn Future<Output = MockResult> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, status_json(404, "NotFound", "not found")));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a minimal namespaced object JSON response
pub fn object_json(api_version: &str, kind: &str, namespace: &str, name: &str) -> String {
    serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a Status failure response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

type ObjectKey = (ResourceKind, String, String);

fn object_key(kind: ResourceKind, namespace: &str, name: &str) -> ObjectKey {
    // Namespaces are cluster-scoped
    let scope = if kind == ResourceKind::Namespace {
        String::new()
    } else {
        namespace.to_string()
    };
    (kind, scope, name.to_string())
}

/// In-memory resource gateway that counts calls and can fail chosen kinds
#[derive(Default)]
pub struct FakeGateway {
    objects: Mutex<HashMap<ObjectKey, ClusterResource>>,
    failing: HashSet<ResourceKind>,
    delay: Option<Duration>,
    gets: AtomicUsize,
    creates: AtomicUsize,
    replaces: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call for `kind` fails with a gateway error
    pub fn failing_on(mut self, kind: ResourceKind) -> Self {
        self.failing.insert(kind);
        self
    }

    /// Every call sleeps for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn seed(&self, namespace: &str, resource: ClusterResource) {
        let key = object_key(resource.kind(), namespace, &resource.name());
        self.objects.lock().unwrap().insert(key, resource);
    }

    /// Store every resource the plan would submit for `namespace`
    pub fn seed_plan(&self, config: &ProvisioningConfig, namespace: &str) {
        let plan = ProvisioningPlan::new(Arc::new(config.clone()));
        for step in plan.steps() {
            if let StepAction::Apply(resources) = plan.action(step.kind, namespace) {
                for resource in resources {
                    self.seed(namespace, resource);
                }
            }
        }
    }

    pub fn seed_terminating_secret(&self, namespace: &str, name: &str) {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                deletion_timestamp: Some(Time(k8s_openapi::chrono::Utc::now())),
                ..Default::default()
            },
            ..Default::default()
        };
        self.seed(namespace, secret.into());
    }

    pub fn contains(&self, kind: ResourceKind, namespace: &str, name: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&object_key(kind, namespace, name))
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn replaces(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }

    /// Total number of gateway calls of any kind
    pub fn calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst) + self.creates() + self.replaces()
    }

    async fn answer(&self, kind: ResourceKind) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&kind) {
            return Err(ProvisionerError::Gateway(kube::Error::Service(
                format!("connection refused while handling {}", kind).into(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceGateway for FakeGateway {
    async fn get(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ClusterResource>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.answer(kind).await?;
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(&object_key(kind, namespace, name))
            .cloned())
    }

    async fn create(&self, namespace: &str, resource: &ClusterResource) -> Result<ClusterResource> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.answer(resource.kind()).await?;
        let key = object_key(resource.kind(), namespace, &resource.name());
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(&key) {
            return Err(ProvisionerError::Conflict(format!(
                "{} {} already exists",
                resource.kind(),
                resource.name()
            )));
        }
        objects.insert(key, resource.clone());
        Ok(resource.clone())
    }

    async fn create_or_replace(
        &self,
        namespace: &str,
        resource: &ClusterResource,
    ) -> Result<ClusterResource> {
        self.replaces.fetch_add(1, Ordering::SeqCst);
        self.answer(resource.kind()).await?;
        self.seed(namespace, resource.clone());
        Ok(resource.clone())
    }
}

enum RunnerBehaviour {
    Exit(i32),
    LaunchFailure,
}

/// Release runner that records the namespaces it was asked to release into
pub struct FakeRunner {
    behaviour: RunnerBehaviour,
    namespaces: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn succeeding() -> Self {
        Self::exiting_with(0)
    }

    pub fn exiting_with(exit_code: i32) -> Self {
        Self {
            behaviour: RunnerBehaviour::Exit(exit_code),
            namespaces: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_to_launch() -> Self {
        Self {
            behaviour: RunnerBehaviour::LaunchFailure,
            namespaces: Mutex::new(Vec::new()),
        }
    }

    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseRunner for FakeRunner {
    async fn run(&self, namespace: &str, params: &ReleaseParams) -> Result<ReleaseOutput> {
        self.namespaces.lock().unwrap().push(namespace.to_string());
        match self.behaviour {
            RunnerBehaviour::Exit(exit_code) => Ok(ReleaseOutput {
                exit_code,
                output_lines: vec![format!(
                    "Release \"{}\" has been upgraded",
                    params.release_name
                )],
            }),
            RunnerBehaviour::LaunchFailure => Err(ProvisionerError::ReleaseLaunch(
                std::io::Error::new(std::io::ErrorKind::NotFound, "helm not found"),
            )),
        }
    }
}

/// Report sink that keeps every outcome
#[derive(Default)]
pub struct RecordingSink {
    outcomes: Mutex<Vec<OnboardingOutcome>>,
}

impl RecordingSink {
    pub fn outcomes(&self) -> Vec<OnboardingOutcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl ReportSink for RecordingSink {
    fn report(&self, outcome: &OnboardingOutcome) {
        self.outcomes.lock().unwrap().push(outcome.clone());
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP intake: synchronous provisioning calls and queued events.

use crate::intake::{Intake, IntakeHandle};
use crate::provisioning::{OnboardingOutcome, OnboardingRequest, OverallStatus};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    intake: Intake,
    queue: IntakeHandle,
}

impl AppState {
    pub fn new(intake: Intake, queue: IntakeHandle) -> Self {
        Self { intake, queue }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ocp/provision", post(provision))
        .route("/ocp/provisionresources", get(provision_from_query))
        .route("/ocp/events", post(enqueue))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn provision(
    State(state): State<AppState>,
    Json(request): Json<OnboardingRequest>,
) -> (StatusCode, Json<OnboardingOutcome>) {
    run(&state, request).await
}

async fn provision_from_query(
    State(state): State<AppState>,
    Query(request): Query<OnboardingRequest>,
) -> (StatusCode, Json<OnboardingOutcome>) {
    run(&state, request).await
}

async fn run(
    state: &AppState,
    request: OnboardingRequest,
) -> (StatusCode, Json<OnboardingOutcome>) {
    info!("Provisioning requested for {}", request.namespace_name());
    let outcome = state.intake.dispatch(request).await;
    (status_code(&outcome), Json(outcome))
}

async fn enqueue(
    State(state): State<AppState>,
    Json(request): Json<OnboardingRequest>,
) -> StatusCode {
    match state.queue.send(request).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn healthz() -> &'static str {
    "ok"
}

fn status_code(outcome: &OnboardingOutcome) -> StatusCode {
    match outcome.status {
        OverallStatus::Success => StatusCode::OK,
        OverallStatus::PartialFailure => StatusCode::MULTI_STATUS,
        OverallStatus::Failed if outcome.cancelled => StatusCode::GATEWAY_TIMEOUT,
        OverallStatus::Failed if outcome.is_rejected() => StatusCode::UNPROCESSABLE_ENTITY,
        OverallStatus::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::session::SessionPhase;
use crate::state::AppState;

/// Readiness response with the identity client status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall status ("ok", "starting" or "failed").
    pub status: String,
    /// Phase of the session state machine.
    pub session: SessionPhase,
    /// RPC endpoint the service talks to.
    pub rpc_target: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Returns 200 once the identity client is initialized, 503 while it is
/// starting or after initialization failed.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let orchestrator = &state.orchestrator;
    let session = orchestrator.snapshot().state;

    let (status, label) = match session {
        SessionPhase::LoggedIn | SessionPhase::LoggedOut => (StatusCode::OK, "ok"),
        SessionPhase::Uninitialized | SessionPhase::Initializing => {
            (StatusCode::SERVICE_UNAVAILABLE, "starting")
        }
        SessionPhase::InitFailed => (StatusCode::SERVICE_UNAVAILABLE, "failed"),
    };

    let response = ReadyResponse {
        status: label.to_string(),
        session,
        rpc_target: orchestrator.chain().rpc_target.clone(),
    };
    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityError;
    use crate::testing::{orchestrator, Script};

    #[tokio::test]
    async fn liveness_is_always_ok() {
        let Json(body) = liveness().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn readiness_follows_initialization() {
        let (orch, _) = orchestrator(Script::default());
        let state = AppState::new(orch);

        let (status, Json(body)) = readiness(State(state.clone())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "starting");

        state.orchestrator.initialize().await;

        let (status, Json(body)) = readiness(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.session, SessionPhase::LoggedOut);
        assert_eq!(body.rpc_target, "https://api.testnet.solana.com");
    }

    #[tokio::test]
    async fn readiness_reports_failed_initialization() {
        let (orch, _) = orchestrator(Script {
            init_error: Some(IdentityError::Configuration("missing client id".into())),
            ..Script::default()
        });
        let state = AppState::new(orch);
        state.orchestrator.initialize().await;

        let (status, Json(body)) = readiness(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "failed");
    }
}

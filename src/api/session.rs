// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ErrorBody},
    session::{Outcome, SessionOrchestrator, SessionView, DEFAULT_TRANSFER_AMOUNT},
    state::AppState,
};

/// Optional body of `POST /v1/session/transfer`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Amount in whole SOL, e.g. "0.01". Defaults to 0.01.
    #[serde(default)]
    pub amount: Option<String>,
}

/// Render the session after `operation`; a trigger refused because another
/// operation holds the session is a conflict.
fn settle(
    orchestrator: &SessionOrchestrator,
    operation: &str,
    outcome: Outcome,
) -> Result<Json<SessionView>, ApiError> {
    debug!(?outcome, operation, "operation finished");
    if outcome == Outcome::Busy {
        return Err(ApiError::busy());
    }
    Ok(Json(orchestrator.snapshot()))
}

#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "Session",
    responses((status = 200, body = SessionView))
)]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.orchestrator.snapshot())
}

#[utoipa::path(
    post,
    path = "/v1/session/login",
    tag = "Session",
    responses(
        (status = 200, body = SessionView),
        (status = 409, body = ErrorBody, description = "Another operation is running")
    )
)]
pub async fn login(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let outcome = state.orchestrator.login().await;
    settle(&state.orchestrator, "login", outcome)
}

#[utoipa::path(
    post,
    path = "/v1/session/logout",
    tag = "Session",
    responses(
        (status = 200, body = SessionView),
        (status = 409, body = ErrorBody, description = "Another operation is running")
    )
)]
pub async fn logout(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let outcome = state.orchestrator.logout().await;
    settle(&state.orchestrator, "logout", outcome)
}

#[utoipa::path(
    post,
    path = "/v1/session/profile",
    tag = "Session",
    responses(
        (status = 200, body = SessionView),
        (status = 409, body = ErrorBody, description = "Another operation is running")
    )
)]
pub async fn fetch_profile(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, ApiError> {
    let outcome = state.orchestrator.fetch_profile().await;
    settle(&state.orchestrator, "fetch_profile", outcome)
}

#[utoipa::path(
    post,
    path = "/v1/session/balance",
    tag = "Session",
    responses(
        (status = 200, body = SessionView),
        (status = 409, body = ErrorBody, description = "Another operation is running")
    )
)]
pub async fn fetch_balance(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, ApiError> {
    let outcome = state.orchestrator.fetch_balance().await;
    settle(&state.orchestrator, "fetch_balance", outcome)
}

/// Self-transfer; the body may be empty.
#[utoipa::path(
    post,
    path = "/v1/session/transfer",
    request_body(
        content = TransferRequest,
        description = "Optional; an empty body sends the default amount",
        content_type = "application/json"
    ),
    tag = "Session",
    responses(
        (status = 200, body = SessionView),
        (status = 400, body = ErrorBody, description = "Malformed request body"),
        (status = 409, body = ErrorBody, description = "Another operation is running")
    )
)]
pub async fn send_transfer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SessionView>, ApiError> {
    let request: TransferRequest = if body.iter().all(u8::is_ascii_whitespace) {
        TransferRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid transfer request: {e}")))?
    };

    let amount = request.amount.as_deref().unwrap_or(DEFAULT_TRANSFER_AMOUNT);
    let outcome = state.orchestrator.send_self_transfer(amount).await;
    settle(&state.orchestrator, "send_self_transfer", outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tokio::sync::Notify;

    use crate::session::{Panel, SessionPhase};
    use crate::testing::{address, orchestrator, transfer_lamports, Script, SIGNATURE};

    async fn ready_state(script: Script) -> (AppState, Arc<crate::testing::Harness>) {
        let (orch, harness) = orchestrator(script);
        let state = AppState::new(orch);
        state.orchestrator.initialize().await;
        (state, harness)
    }

    #[tokio::test]
    async fn login_returns_logged_in_view() {
        let (state, _) = ready_state(Script::default()).await;

        let Json(view) = login(State(state.clone()))
            .await
            .expect("login accepted");

        assert_eq!(view.state, SessionPhase::LoggedIn);
        assert_eq!(view.wallet_address.as_deref(), Some(address().as_str()));
        assert!(!view.busy);

        let Json(current) = get_session(State(state)).await;
        assert_eq!(current.wallet_address.as_deref(), Some(address().as_str()));
    }

    #[tokio::test]
    async fn failed_operation_is_reported_in_view_not_status() {
        let (state, harness) = ready_state(Script::default()).await;
        let Json(view) = login(State(state.clone())).await.expect("login accepted");
        assert_eq!(view.state, SessionPhase::LoggedIn);
        harness.edit(|s| s.balance_error = Some("connection refused".into()));

        let Json(view) = fetch_balance(State(state))
            .await
            .expect("balance accepted");

        assert!(view
            .last_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Balance error")));
        assert_eq!(view.visible_panel, Panel::None);
    }

    #[tokio::test]
    async fn transfer_with_empty_body_uses_default_amount() {
        let (state, harness) = ready_state(Script::default()).await;
        let Json(view) = login(State(state.clone())).await.expect("login accepted");
        assert_eq!(view.state, SessionPhase::LoggedIn);

        let Json(view) = send_transfer(State(state), Bytes::new())
            .await
            .expect("transfer accepted");

        assert!(view
            .last_message
            .as_deref()
            .is_some_and(|m| m.contains(SIGNATURE)));
        assert_eq!(transfer_lamports(&harness.signed_messages()[0]), 10_000_000);
    }

    #[tokio::test]
    async fn transfer_with_explicit_amount() {
        let (state, harness) = ready_state(Script::default()).await;
        let Json(view) = login(State(state.clone())).await.expect("login accepted");
        assert_eq!(view.state, SessionPhase::LoggedIn);

        let Json(view) = send_transfer(State(state), Bytes::from_static(br#"{"amount":"0.25"}"#))
            .await
            .expect("transfer accepted");
        assert!(!view.busy);

        assert_eq!(transfer_lamports(&harness.signed_messages()[0]), 250_000_000);
    }

    #[tokio::test]
    async fn transfer_with_malformed_body_is_rejected() {
        let (state, harness) = ready_state(Script::default()).await;
        let Json(view) = login(State(state.clone())).await.expect("login accepted");
        assert_eq!(view.state, SessionPhase::LoggedIn);
        harness.clear_calls();

        let err = send_transfer(State(state), Bytes::from_static(b"{amount"))
            .await
            .expect_err("malformed body");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(harness.calls().is_empty());
    }

    #[tokio::test]
    async fn triggers_are_rejected_while_busy() {
        let gate = Arc::new(Notify::new());
        let (state, harness) = ready_state(Script {
            connect_gate: Some(gate.clone()),
            ..Script::default()
        })
        .await;

        let pending = {
            let state = state.clone();
            tokio::spawn(async move { state.orchestrator.login().await })
        };
        while !state.orchestrator.is_busy() {
            tokio::task::yield_now().await;
        }

        let err = fetch_balance(State(state.clone()))
            .await
            .expect_err("busy session");
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err = login(State(state.clone())).await.expect_err("busy session");
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(harness.count("connect"), 1);

        // Reads are still served.
        let Json(view) = get_session(State(state.clone())).await;
        assert!(view.busy);

        gate.notify_one();
        pending.await.expect("login task");

        let Json(view) = logout(State(state)).await.expect("logout accepted");
        assert_eq!(view.state, SessionPhase::LoggedOut);
    }
}
